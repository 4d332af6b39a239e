//! SQL query constants
//!
//! Contains all SQL statements used by the application. Rows come back as a
//! single `data` JSONB column so every table shares one decoding path.
//! Parameters carry explicit casts so text-typed bindings also fit columns
//! declared as varchar.

use crate::entity::Entity;

// ---------------------------------------------------------------------------
// Reads. `LIMIT NULL` means no limit.
// ---------------------------------------------------------------------------

pub const LIST_SERVICES: &str = r#"
    SELECT to_jsonb(t) AS data FROM services t
    ORDER BY t.id
    LIMIT $1::int8
"#;

pub const LIST_REGIONS: &str = r#"
    SELECT to_jsonb(t) AS data FROM regions t
    ORDER BY t.id
    LIMIT $1::int8
"#;

pub const LIST_NEWS: &str = r#"
    SELECT to_jsonb(t) AS data FROM news t
    ORDER BY t.created_at DESC, t.id DESC
    LIMIT $1::int8
"#;

pub const LIST_SCHEDULE: &str = r#"
    SELECT to_jsonb(t) AS data FROM schedule t
    ORDER BY t.id
    LIMIT $1::int8
"#;

pub const LIST_COMPANY_INFO: &str = r#"
    SELECT to_jsonb(t) AS data FROM company_info t
    ORDER BY t.key
    LIMIT $1::int8
"#;

// ---------------------------------------------------------------------------
// Inserts
// ---------------------------------------------------------------------------

pub const INSERT_SERVICE: &str = r#"
    WITH inserted AS (
        INSERT INTO services (icon, title, description, color)
        VALUES ($1::text, $2::text, $3::text, $4::text)
        RETURNING *
    )
    SELECT to_jsonb(inserted) AS data FROM inserted
"#;

pub const INSERT_REGION: &str = r#"
    WITH inserted AS (
        INSERT INTO regions (name, passengers, routes)
        VALUES ($1::text, $2::text, $3::int4)
        RETURNING *
    )
    SELECT to_jsonb(inserted) AS data FROM inserted
"#;

pub const INSERT_NEWS: &str = r#"
    WITH inserted AS (
        INSERT INTO news (date, title, category, content)
        VALUES ($1::text, $2::text, $3::text, $4::text)
        RETURNING *
    )
    SELECT to_jsonb(inserted) AS data FROM inserted
"#;

pub const INSERT_SCHEDULE: &str = r#"
    WITH inserted AS (
        INSERT INTO schedule (route, departure, arrival, transport)
        VALUES ($1::text, $2::text, $3::text, $4::text)
        RETURNING *
    )
    SELECT to_jsonb(inserted) AS data FROM inserted
"#;

// ---------------------------------------------------------------------------
// Updates. NULL parameters keep the stored value.
// ---------------------------------------------------------------------------

pub const UPDATE_SERVICE: &str = r#"
    WITH updated AS (
        UPDATE services SET
            icon = COALESCE($2::text, icon),
            title = COALESCE($3::text, title),
            description = COALESCE($4::text, description),
            color = COALESCE($5::text, color),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1::int4
        RETURNING *
    )
    SELECT to_jsonb(updated) AS data FROM updated
"#;

pub const UPDATE_REGION: &str = r#"
    WITH updated AS (
        UPDATE regions SET
            name = COALESCE($2::text, name),
            passengers = COALESCE($3::text, passengers),
            routes = COALESCE($4::int4, routes),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1::int4
        RETURNING *
    )
    SELECT to_jsonb(updated) AS data FROM updated
"#;

pub const UPDATE_NEWS: &str = r#"
    WITH updated AS (
        UPDATE news SET
            date = COALESCE($2::text, date),
            title = COALESCE($3::text, title),
            category = COALESCE($4::text, category),
            content = COALESCE($5::text, content),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1::int4
        RETURNING *
    )
    SELECT to_jsonb(updated) AS data FROM updated
"#;

pub const UPDATE_SCHEDULE: &str = r#"
    WITH updated AS (
        UPDATE schedule SET
            route = COALESCE($2::text, route),
            departure = COALESCE($3::text, departure),
            arrival = COALESCE($4::text, arrival),
            transport = COALESCE($5::text, transport),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1::int4
        RETURNING *
    )
    SELECT to_jsonb(updated) AS data FROM updated
"#;

pub const UPDATE_COMPANY_INFO: &str = r#"
    WITH updated AS (
        UPDATE company_info SET
            value = $2::text,
            updated_at = CURRENT_TIMESTAMP
        WHERE key = $1::text
        RETURNING *
    )
    SELECT to_jsonb(updated) AS data FROM updated
"#;

// ---------------------------------------------------------------------------
// Deletes
// ---------------------------------------------------------------------------

pub const DELETE_SERVICE: &str = "DELETE FROM services WHERE id = $1::int4";
pub const DELETE_REGION: &str = "DELETE FROM regions WHERE id = $1::int4";
pub const DELETE_NEWS: &str = "DELETE FROM news WHERE id = $1::int4";
pub const DELETE_SCHEDULE: &str = "DELETE FROM schedule WHERE id = $1::int4";

/// Ordered read for an entity
pub fn list(entity: Entity) -> &'static str {
    match entity {
        Entity::Services => LIST_SERVICES,
        Entity::Regions => LIST_REGIONS,
        Entity::News => LIST_NEWS,
        Entity::Schedule => LIST_SCHEDULE,
        Entity::CompanyInfo => LIST_COMPANY_INFO,
    }
}

/// Delete statement, absent for the fixed-key table
pub fn delete(entity: Entity) -> Option<&'static str> {
    match entity {
        Entity::Services => Some(DELETE_SERVICE),
        Entity::Regions => Some(DELETE_REGION),
        Entity::News => Some(DELETE_NEWS),
        Entity::Schedule => Some(DELETE_SCHEDULE),
        Entity::CompanyInfo => None,
    }
}

/// Opt-in schema bootstrap, run at startup when DB_BOOTSTRAP_SCHEMA is set
pub const BOOTSTRAP_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS services (
        id SERIAL PRIMARY KEY,
        icon VARCHAR(100) NOT NULL,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        color VARCHAR(100) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS regions (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        passengers VARCHAR(100) NOT NULL DEFAULT '',
        routes INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS news (
        id SERIAL PRIMARY KEY,
        date VARCHAR(100) NOT NULL,
        title VARCHAR(500) NOT NULL,
        category VARCHAR(100) NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS schedule (
        id SERIAL PRIMARY KEY,
        route VARCHAR(255) NOT NULL,
        departure VARCHAR(20) NOT NULL,
        arrival VARCHAR(20) NOT NULL,
        transport VARCHAR(100) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS company_info (
        key VARCHAR(100) PRIMARY KEY,
        value TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_news_created_at ON news(created_at DESC)",
];
