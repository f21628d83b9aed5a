//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable persistence APIs over `books`, the three name entities
//!   and their association tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call model validation before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - ISBNs are normalized before every write and isbn lookup.
//! - Duplicate unique-key and duplicate association-pair inserts surface as
//!   [`RepoError::Conflict`], never as panics or partial writes.

use crate::db::DbError;
use crate::model::book::{
    normalize_isbn, Book, BookDetail, BookDraft, BookId, BookSummary, BookValidationError,
};
use crate::model::entity::{Author, AuthorId, Category, CategoryId, Tag, TagId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use uuid::Uuid;

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    isbn,
    title,
    description,
    thumbnail,
    published_year,
    created_at
FROM books";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    /// Unique-key or duplicate-pair constraint violation. The payload names
    /// the violated constraint for logging.
    Conflict(&'static str),
    InvalidData(String),
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
            Self::NotFound(id) => write!(f, "catalog row not found: {id}"),
            Self::Conflict(constraint) => write!(f, "constraint conflict on {constraint}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
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

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
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

/// Title ordering for listing queries.
///
/// Anything other than the literal `asc` requests descending order, matching
/// the catalog's lenient query-parameter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleOrder {
    #[default]
    Asc,
    Desc,
}

impl TitleOrder {
    /// Parses a caller-facing ordering parameter.
    pub fn from_param(raw: &str) -> Self {
        if raw.trim() == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn sql_keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Repository interface for catalog persistence operations.
///
/// Lookup-by-name methods compare trimmed input case-insensitively; listing
/// methods order by title with `id` as tie-break so pagination stays stable.
pub trait BookRepository {
    /// Inserts one book row. Duplicate ISBN maps to [`RepoError::Conflict`].
    fn insert_book(&self, draft: &BookDraft) -> RepoResult<Book>;
    /// Finds one book by ISBN (normalized before lookup).
    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>>;
    /// Loads the detail projection (authors + merged topics) by ISBN.
    fn get_detail_by_isbn(&self, isbn: &str) -> RepoResult<Option<BookDetail>>;
    /// Returns whether one book row exists.
    fn book_exists(&self, id: BookId) -> RepoResult<bool>;

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn insert_author(&self, name: &str) -> RepoResult<Author>;
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    fn insert_category(&self, name: &str) -> RepoResult<Category>;
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    fn insert_tag(&self, name: &str) -> RepoResult<Tag>;

    /// Links one author to one book. Duplicate pair maps to `Conflict`.
    fn link_author(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<()>;
    /// Links one category to one book. Duplicate pair maps to `Conflict`.
    fn link_category(&self, book_id: BookId, category_id: CategoryId) -> RepoResult<()>;
    /// Links one tag to one book. Duplicate pair maps to `Conflict`.
    fn link_tag(&self, book_id: BookId, tag_id: TagId) -> RepoResult<()>;

    /// Ids of books carrying any of the given topic names, where a topic
    /// matches either a linked category or a linked tag case-insensitively.
    fn book_ids_by_topics(&self, topics: &[String]) -> RepoResult<BTreeSet<BookId>>;
    /// Ids of books written by the given author, matched case-insensitively.
    fn book_ids_by_author(&self, author: &str) -> RepoResult<BTreeSet<BookId>>;
    /// Counts books, optionally restricted to a candidate id set.
    fn count_books(&self, candidates: Option<&BTreeSet<BookId>>) -> RepoResult<u64>;
    /// Lists summary projections ordered by title, paginated, optionally
    /// restricted to a candidate id set.
    fn list_summaries(
        &self,
        order: TitleOrder,
        skip: u32,
        take: u32,
        candidates: Option<&BTreeSet<BookId>>,
    ) -> RepoResult<Vec<BookSummary>>;

    /// All distinct topic names (categories plus tags), ordered
    /// case-insensitively.
    fn topic_names(&self) -> RepoResult<Vec<String>>;
    /// Topic names containing the given fragment, case-insensitively.
    fn search_topic_names(&self, predicate: &str, take: u32) -> RepoResult<Vec<String>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, draft: &BookDraft) -> RepoResult<Book> {
        draft.validate()?;
        insert_book_row(self.conn, draft)
    }

    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        find_book_by_isbn(self.conn, isbn)
    }

    fn get_detail_by_isbn(&self, isbn: &str) -> RepoResult<Option<BookDetail>> {
        let key = normalize_isbn(isbn);
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL}
             WHERE isbn = ?1;"
        ))?;
        let mut rows = stmt.query([key.as_str()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let book = parse_book_row(row)?;
        let book_id_text = book.id.to_string();
        let authors = load_author_names_for_book(self.conn, &book_id_text)?;
        let topics = load_topics_for_book(self.conn, &book_id_text)?;
        Ok(Some(BookDetail {
            id: book.id,
            isbn: book.isbn,
            title: book.title,
            description: book.description,
            thumbnail: book.thumbnail,
            published_year: book.published_year,
            authors,
            topics,
        }))
    }

    fn book_exists(&self, id: BookId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        Ok(find_named_row(self.conn, "authors", name)?.map(|row| Author {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }))
    }

    fn insert_author(&self, name: &str) -> RepoResult<Author> {
        let row = insert_named_row(self.conn, "authors", name)?;
        Ok(Author {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        Ok(find_named_row(self.conn, "categories", name)?.map(|row| Category {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }))
    }

    fn insert_category(&self, name: &str) -> RepoResult<Category> {
        let row = insert_named_row(self.conn, "categories", name)?;
        Ok(Category {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        Ok(find_named_row(self.conn, "tags", name)?.map(|row| Tag {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }))
    }

    fn insert_tag(&self, name: &str) -> RepoResult<Tag> {
        let row = insert_named_row(self.conn, "tags", name)?;
        Ok(Tag {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    fn link_author(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<()> {
        insert_link_row(
            self.conn,
            "INSERT INTO written (book_id, author_id) VALUES (?1, ?2);",
            book_id,
            author_id,
            "written(book_id, author_id)",
        )
    }

    fn link_category(&self, book_id: BookId, category_id: CategoryId) -> RepoResult<()> {
        insert_link_row(
            self.conn,
            "INSERT INTO categorized (book_id, category_id) VALUES (?1, ?2);",
            book_id,
            category_id,
            "categorized(book_id, category_id)",
        )
    }

    fn link_tag(&self, book_id: BookId, tag_id: TagId) -> RepoResult<()> {
        insert_link_row(
            self.conn,
            "INSERT INTO tagged (book_id, tag_id) VALUES (?1, ?2);",
            book_id,
            tag_id,
            "tagged(book_id, tag_id)",
        )
    }

    fn book_ids_by_topics(&self, topics: &[String]) -> RepoResult<BTreeSet<BookId>> {
        if topics.is_empty() {
            return Ok(BTreeSet::new());
        }

        let placeholders = sql_placeholders(topics.len());
        let sql = format!(
            "SELECT bc.book_id AS book_id
             FROM categorized bc
             INNER JOIN categories c ON c.id = bc.category_id
             WHERE c.name COLLATE NOCASE IN ({placeholders})
             UNION
             SELECT bt.book_id AS book_id
             FROM tagged bt
             INNER JOIN tags t ON t.id = bt.tag_id
             WHERE t.name COLLATE NOCASE IN ({placeholders});"
        );

        let mut bind_values: Vec<Value> = Vec::with_capacity(topics.len() * 2);
        for topic in topics {
            bind_values.push(Value::Text(topic.clone()));
        }
        for topic in topics {
            bind_values.push(Value::Text(topic.clone()));
        }

        collect_book_ids(self.conn, &sql, bind_values)
    }

    fn book_ids_by_author(&self, author: &str) -> RepoResult<BTreeSet<BookId>> {
        let needle = author.trim();
        if needle.is_empty() {
            return Ok(BTreeSet::new());
        }

        collect_book_ids(
            self.conn,
            "SELECT bw.book_id AS book_id
             FROM written bw
             INNER JOIN authors a ON a.id = bw.author_id
             WHERE a.name = ? COLLATE NOCASE;",
            vec![Value::Text(needle.to_string())],
        )
    }

    fn count_books(&self, candidates: Option<&BTreeSet<BookId>>) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM books");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(ids) = candidates {
            if ids.is_empty() {
                return Ok(0);
            }
            let _ = write!(sql, " WHERE id IN ({})", sql_placeholders(ids.len()));
            bind_values.extend(ids.iter().map(|id| Value::Text(id.to_string())));
        }
        sql.push(';');

        let count: u64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(count)
    }

    fn list_summaries(
        &self,
        order: TitleOrder,
        skip: u32,
        take: u32,
        candidates: Option<&BTreeSet<BookId>>,
    ) -> RepoResult<Vec<BookSummary>> {
        let mut sql = String::from(
            "SELECT
                id,
                isbn,
                title,
                thumbnail
             FROM books",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(ids) = candidates {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let _ = write!(sql, " WHERE id IN ({})", sql_placeholders(ids.len()));
            bind_values.extend(ids.iter().map(|id| Value::Text(id.to_string())));
        }

        let _ = write!(
            sql,
            " ORDER BY title COLLATE NOCASE {}, id ASC LIMIT ? OFFSET ?",
            order.sql_keyword()
        );
        bind_values.push(Value::Integer(i64::from(take)));
        bind_values.push(Value::Integer(i64::from(skip)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let id = parse_book_uuid(&id_text, "books.id")?;
            let topics = load_topics_for_book(self.conn, &id_text)?;
            summaries.push(BookSummary {
                id,
                isbn: row.get("isbn")?,
                title: row.get("title")?,
                thumbnail: row.get("thumbnail")?,
                topics,
            });
        }

        Ok(summaries)
    }

    fn topic_names(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM (
                SELECT name FROM categories
                UNION
                SELECT name FROM tags
             )
             ORDER BY name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>("name")?);
        }
        Ok(names)
    }

    fn search_topic_names(&self, predicate: &str, take: u32) -> RepoResult<Vec<String>> {
        let pattern = format!("%{}%", escape_like_pattern(predicate.trim()));
        let mut stmt = self.conn.prepare(
            "SELECT name FROM (
                SELECT name FROM categories
                UNION
                SELECT name FROM tags
             )
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name COLLATE NOCASE ASC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![pattern, take])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>("name")?);
        }
        Ok(names)
    }
}

/// Inserts one book row and re-reads the stored record.
///
/// Exposed to the enrichment resolver so transactional writes share one SQL
/// path with the plain repository.
pub(crate) fn insert_book_row(conn: &Connection, draft: &BookDraft) -> RepoResult<Book> {
    let id = Uuid::new_v4();
    let key = normalize_isbn(&draft.isbn);
    conn.execute(
        "INSERT INTO books (
            id,
            isbn,
            title,
            description,
            thumbnail,
            published_year
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            id.to_string(),
            key.as_str(),
            draft.title.as_str(),
            draft.description.as_deref(),
            draft.thumbnail.as_deref(),
            draft.published_year,
        ],
    )
    .map_err(|err| map_constraint_error(err, "books.isbn"))?;

    load_required_book(conn, id)
}

/// Finds one book by normalized ISBN.
pub(crate) fn find_book_by_isbn(conn: &Connection, isbn: &str) -> RepoResult<Option<Book>> {
    let key = normalize_isbn(isbn);
    let mut stmt = conn.prepare(&format!(
        "{BOOK_SELECT_SQL}
         WHERE isbn = ?1;"
    ))?;
    let mut rows = stmt.query([key.as_str()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }
    Ok(None)
}

fn load_required_book(conn: &Connection, id: BookId) -> RepoResult<Book> {
    let mut stmt = conn.prepare(&format!(
        "{BOOK_SELECT_SQL}
         WHERE id = ?1;"
    ))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_book_row(row);
    }
    Err(RepoError::NotFound(id))
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id_text: String = row.get("id")?;
    let id = parse_book_uuid(&id_text, "books.id")?;

    let book = Book {
        id,
        isbn: row.get("isbn")?,
        title: row.get("title")?,
        description: row.get("description")?,
        thumbnail: row.get("thumbnail")?,
        published_year: row.get("published_year")?,
        created_at: row.get("created_at")?,
    };
    book.validate()?;
    Ok(book)
}

fn parse_book_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Raw row shape shared by the three name-entity tables.
pub(crate) struct NamedRow {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) created_at: i64,
}

/// Finds one name-entity row by trimmed, case-insensitive name.
///
/// When several case variants exist the oldest row wins, keeping lookups
/// deterministic even though name uniqueness is only advisory.
pub(crate) fn find_named_row(
    conn: &Connection,
    table: &'static str,
    name: &str,
) -> RepoResult<Option<NamedRow>> {
    let needle = name.trim();
    if needle.is_empty() {
        return Ok(None);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, created_at
         FROM {table}
         WHERE name = ?1 COLLATE NOCASE
         ORDER BY created_at ASC, id ASC
         LIMIT 1;"
    ))?;
    let mut rows = stmt.query([needle])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_named_row(row, table)?));
    }
    Ok(None)
}

/// Inserts one name-entity row storing the trimmed, first-seen casing.
pub(crate) fn insert_named_row(
    conn: &Connection,
    table: &'static str,
    name: &str,
) -> RepoResult<NamedRow> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name rejected for table `{table}`"
        )));
    }

    let id = Uuid::new_v4();
    conn.execute(
        &format!("INSERT INTO {table} (id, name) VALUES (?1, ?2);"),
        params![id.to_string(), trimmed],
    )?;

    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, created_at
         FROM {table}
         WHERE id = ?1;"
    ))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_named_row(row, table);
    }
    Err(RepoError::NotFound(id))
}

fn parse_named_row(row: &Row<'_>, table: &'static str) -> RepoResult<NamedRow> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in {table}.id"))
    })?;
    Ok(NamedRow {
        id,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

/// Inserts one association row, mapping duplicate pairs to `Conflict`.
pub(crate) fn insert_link_row(
    conn: &Connection,
    sql: &str,
    book_id: BookId,
    other_id: Uuid,
    constraint: &'static str,
) -> RepoResult<()> {
    conn.execute(sql, params![book_id.to_string(), other_id.to_string()])
        .map_err(|err| map_constraint_error(err, constraint))?;
    Ok(())
}

/// Loads the merged topic projection (category plus tag names) for one book.
///
/// The `UNION` deduplicates exact strings; ordering is case-insensitive.
pub(crate) fn load_topics_for_book(conn: &Connection, book_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM (
            SELECT c.name AS name
            FROM categorized bc
            INNER JOIN categories c ON c.id = bc.category_id
            WHERE bc.book_id = ?1
            UNION
            SELECT t.name AS name
            FROM tagged bt
            INNER JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ?1
         )
         ORDER BY name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut topics = Vec::new();
    while let Some(row) = rows.next()? {
        topics.push(row.get::<_, String>("name")?);
    }
    Ok(topics)
}

fn load_author_names_for_book(conn: &Connection, book_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT a.name
         FROM written bw
         INNER JOIN authors a ON a.id = bw.author_id
         WHERE bw.book_id = ?1
         ORDER BY a.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get::<_, String>(0)?);
    }
    Ok(names)
}

fn collect_book_ids(
    conn: &Connection,
    sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<BTreeSet<BookId>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("book_id")?;
        ids.insert(parse_book_uuid(&id_text, "book_id")?);
    }
    Ok(ids)
}

/// Maps unique-key and primary-key violations to [`RepoError::Conflict`].
pub(crate) fn map_constraint_error(err: rusqlite::Error, constraint: &'static str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Conflict(constraint);
    }
    RepoError::from(err)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

fn sql_placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count * 3);
    for index in 0..count {
        if index > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}

fn escape_like_pattern(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in [
        "books",
        "authors",
        "categories",
        "tags",
        "written",
        "categorized",
        "tagged",
    ] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in [
        "id",
        "isbn",
        "title",
        "description",
        "thumbnail",
        "published_year",
        "created_at",
    ] {
        if !table_has_column(conn, "books", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &'static str) -> RepoResult<bool> {
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

fn table_has_column(conn: &Connection, table: &'static str, column: &'static str) -> RepoResult<bool> {
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
    use super::*;

    #[test]
    fn title_order_param_is_lenient() {
        assert_eq!(TitleOrder::from_param("asc"), TitleOrder::Asc);
        assert_eq!(TitleOrder::from_param(" asc "), TitleOrder::Asc);
        assert_eq!(TitleOrder::from_param("desc"), TitleOrder::Desc);
        assert_eq!(TitleOrder::from_param("ASC"), TitleOrder::Desc);
        assert_eq!(TitleOrder::from_param(""), TitleOrder::Desc);
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(escape_like_pattern("100%_fun"), "100\\%\\_fun");
        assert_eq!(escape_like_pattern("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }

    #[test]
    fn placeholder_lists_are_comma_separated() {
        assert_eq!(sql_placeholders(1), "?");
        assert_eq!(sql_placeholders(3), "?, ?, ?");
    }
}
