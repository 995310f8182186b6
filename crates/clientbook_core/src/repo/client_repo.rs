//! Client repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `clients` storage.
//! - Implement the fixed lookup operations (name, income, birth date) with
//!   exact matching semantics pushed down to SQL.
//!
//! # Invariants
//! - Write paths must call validation before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Name matching folds ASCII case only (SQLite `LOWER` semantics).
//! - Income comparisons use exact IEEE-754 equality, no epsilon.
//! - Inclusive ranges with inverted bounds yield empty results, not errors.

use crate::db::{migrations, DbError};
use crate::model::client::{Client, ClientId, ClientValidationError, NewClient};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    income,
    birth_date,
    children
FROM clients";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    /// Id-addressed record does not exist (update path).
    NotFound(ClientId),
    /// Required exact-name lookup found no record.
    NameNotFound(String),
    InvalidData(String),
    /// Connection has no applied schema (`PRAGMA user_version` is 0).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::NameNotFound(name) => write!(f, "no client named `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not initialized (expected {expected_version})"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for client CRUD and the fixed lookup operations.
///
/// Every lookup is a pure predicate over the full record set. Sequence
/// results are ordered by id ascending, the store's natural order.
pub trait ClientRepository {
    /// Inserts one record and returns the store-assigned id.
    fn insert(&self, client: &NewClient) -> RepoResult<ClientId>;
    /// Replaces all mutable fields of an existing record.
    fn update(&self, client: &Client) -> RepoResult<()>;
    /// Gets one record by id.
    fn get(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Returns every record in id order.
    fn list_all(&self) -> RepoResult<Vec<Client>>;
    /// Returns whether a record with this id exists.
    fn exists(&self, id: ClientId) -> RepoResult<bool>;
    /// Returns the total record count.
    fn count(&self) -> RepoResult<u64>;

    /// Case-insensitive exact name match; zero-or-one record.
    ///
    /// When several records share the name, the lowest id wins.
    fn find_by_name_exact(&self, name: &str) -> RepoResult<Option<Client>>;
    /// Case-insensitive substring match anywhere in the name.
    ///
    /// An empty fragment matches every record.
    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Client>>;
    /// Strict `income > threshold`; the boundary value is excluded.
    fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>>;
    /// Strict `income < threshold`; the boundary value is excluded.
    fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>>;
    /// Inclusive `low <= income <= high`; `low > high` yields empty.
    fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>>;
    /// Exact IEEE-754 equality on income, no tolerance.
    fn find_by_income_equal(&self, value: f64) -> RepoResult<Vec<Client>>;
    /// Inclusive birth-date window on epoch-ms instants; inverted yields empty.
    fn find_by_birth_date_between(&self, start: i64, end: i64) -> RepoResult<Vec<Client>>;

    /// Hard-deletes one record by id.
    ///
    /// Returns whether a record existed; deleting a missing id is a no-op.
    fn delete_by_id(&self, id: ClientId) -> RepoResult<bool>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Constructs a repository after verifying the connection is migrated
    /// and carries the required `clients` schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn select_where(&self, condition: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Client>> {
        let sql = format!("{CLIENT_SELECT_SQL} WHERE {condition} ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn insert(&self, client: &NewClient) -> RepoResult<ClientId> {
        client.validate()?;

        self.conn.execute(
            "INSERT INTO clients (name, income, birth_date, children)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                client.name.as_str(),
                client.income,
                client.birth_date,
                client.children,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, client: &Client) -> RepoResult<()> {
        client.validate()?;

        let changed = self.conn.execute(
            "UPDATE clients
             SET
                name = ?1,
                income = ?2,
                birth_date = ?3,
                children = ?4
             WHERE id = ?5;",
            params![
                client.name.as_str(),
                client.income,
                client.birth_date,
                client.children,
                client.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(client.id));
        }

        Ok(())
    }

    fn get(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Client>> {
        self.select_where("1 = 1", Vec::new())
    }

    fn exists(&self, id: ClientId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM clients;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))
    }

    fn find_by_name_exact(&self, name: &str) -> RepoResult<Option<Client>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CLIENT_SELECT_SQL}
             WHERE LOWER(name) = LOWER(?1)
             ORDER BY id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }

        Ok(None)
    }

    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Client>> {
        let pattern = format!("%{}%", escape_like(&fragment.to_ascii_lowercase()));
        self.select_where(
            "LOWER(name) LIKE ?1 ESCAPE '\\'",
            vec![Value::Text(pattern)],
        )
    }

    fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.select_where("income > ?1", vec![Value::Real(threshold)])
    }

    fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.select_where("income < ?1", vec![Value::Real(threshold)])
    }

    fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>> {
        self.select_where(
            "income BETWEEN ?1 AND ?2",
            vec![Value::Real(low), Value::Real(high)],
        )
    }

    fn find_by_income_equal(&self, value: f64) -> RepoResult<Vec<Client>> {
        self.select_where("income = ?1", vec![Value::Real(value)])
    }

    fn find_by_birth_date_between(&self, start: i64, end: i64) -> RepoResult<Vec<Client>> {
        self.select_where(
            "birth_date BETWEEN ?1 AND ?2",
            vec![Value::Integer(start), Value::Integer(end)],
        )
    }

    fn delete_by_id(&self, id: ClientId) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])?;

        debug!(
            "event=client_delete module=repo status=ok id={id} removed={}",
            removed > 0
        );
        Ok(removed > 0)
    }
}

/// Escapes `LIKE` metacharacters so a fragment only ever matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let client = Client {
        id: row.get("id")?,
        name: row.get("name")?,
        income: row.get("income")?,
        birth_date: row.get("birth_date")?,
        children: row.get("children")?,
    };
    client.validate()?;
    Ok(client)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "clients")? {
        return Err(RepoError::MissingRequiredTable("clients"));
    }

    for column in ["id", "name", "income", "birth_date", "children"] {
        if !table_has_column(conn, "clients", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "clients",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_leaves_plain_text_alone() {
        assert_eq!(escape_like("maria"), "maria");
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn escape_like_of_empty_fragment_is_empty() {
        assert_eq!(escape_like(""), "");
    }
}
