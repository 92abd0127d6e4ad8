//! SQL for the hotel schema and its fixed seed data.
//! DDL differs per backend; the seed inserts are portable.

/// Bumped whenever the DDL or seed changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Marker table; one row per applied schema version.
pub const SCHEMA_VERSION_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL -- RFC3339
)
"#;

/// SQLite schema. Foreign keys are enforced per connection (sqlx enables them).
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NULL REFERENCES categories(id),
    room_number INTEGER NOT NULL UNIQUE,
    capacity INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS citizens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    passport_number TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS placements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    citizen_id INTEGER NOT NULL REFERENCES citizens(id),
    room_id INTEGER NOT NULL REFERENCES rooms(id),
    start_date TEXT NOT NULL, -- YYYY-MM-DD
    duration_days INTEGER NOT NULL
);
"#;

pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS placements;
DROP TABLE IF EXISTS citizens;
DROP TABLE IF EXISTS rooms;
DROP TABLE IF EXISTS categories;
"#;

pub const POSTGRES_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
    id SERIAL PRIMARY KEY,
    category_id INTEGER NULL REFERENCES categories(id),
    room_number INTEGER NOT NULL UNIQUE,
    capacity INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS citizens (
    id SERIAL PRIMARY KEY,
    full_name VARCHAR(255) NOT NULL,
    passport_number VARCHAR(255) NOT NULL
);

CREATE TABLE IF NOT EXISTS placements (
    id SERIAL PRIMARY KEY,
    citizen_id INTEGER NOT NULL REFERENCES citizens(id),
    room_id INTEGER NOT NULL REFERENCES rooms(id),
    start_date DATE NOT NULL,
    duration_days INTEGER NOT NULL
);
"#;

pub const POSTGRES_DROP: &str = r#"
DROP TABLE IF EXISTS placements CASCADE;
DROP TABLE IF EXISTS citizens CASCADE;
DROP TABLE IF EXISTS rooms CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
"#;

/// Fixed seed rows. Besides the regular data it covers a room with no
/// category (401), a category with no rooms (Суперлюкс) and a category whose
/// every room is occupied (Эконом).
pub const SEED: &str = r#"
INSERT INTO categories (name) VALUES
    ('Эконом'),
    ('Стандарт'),
    ('Люкс');

INSERT INTO rooms (category_id, room_number, capacity) VALUES
    ((SELECT id FROM categories WHERE name = 'Эконом'), 101, 2),
    ((SELECT id FROM categories WHERE name = 'Эконом'), 102, 1),
    ((SELECT id FROM categories WHERE name = 'Эконом'), 103, 2),
    ((SELECT id FROM categories WHERE name = 'Стандарт'), 201, 2),
    ((SELECT id FROM categories WHERE name = 'Стандарт'), 202, 1),
    ((SELECT id FROM categories WHERE name = 'Стандарт'), 203, 3),
    ((SELECT id FROM categories WHERE name = 'Люкс'), 301, 2),
    ((SELECT id FROM categories WHERE name = 'Люкс'), 302, 1);

INSERT INTO citizens (full_name, passport_number) VALUES
    ('Иванов Иван Иванович', '1234 567890'),
    ('Петров Петр Петрович', '9876 543210'),
    ('Сидоров Сидор Сидорович', '1122 334455'),
    ('Смирнов Алексей Сергеевич', '5544 332211');

INSERT INTO placements (citizen_id, room_id, start_date, duration_days) VALUES
    ((SELECT id FROM citizens WHERE passport_number = '1234 567890'), (SELECT id FROM rooms WHERE room_number = 101), '2024-01-01', 5),
    ((SELECT id FROM citizens WHERE passport_number = '9876 543210'), (SELECT id FROM rooms WHERE room_number = 201), '2024-01-05', 3),
    ((SELECT id FROM citizens WHERE passport_number = '1122 334455'), (SELECT id FROM rooms WHERE room_number = 203), '2024-01-10', 7),
    ((SELECT id FROM citizens WHERE passport_number = '5544 332211'), (SELECT id FROM rooms WHERE room_number = 301), '2024-01-15', 2);

-- room without a category
INSERT INTO rooms (room_number, capacity) VALUES (401, 2);

-- category without rooms
INSERT INTO categories (name) VALUES ('Суперлюкс');

-- fills the remaining Эконом rooms
INSERT INTO placements (citizen_id, room_id, start_date, duration_days) VALUES
    ((SELECT id FROM citizens WHERE passport_number = '1234 567890'), (SELECT id FROM rooms WHERE room_number = 102), '2024-02-01', 5),
    ((SELECT id FROM citizens WHERE passport_number = '9876 543210'), (SELECT id FROM rooms WHERE room_number = 103), '2024-02-05', 3);
"#;

/// Splits a script into single statements; sqlx prepares one at a time.
/// Scripts here never contain `;` inside literals or comments.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_split_into_expected_statement_counts() {
        assert_eq!(statements(SQLITE_INIT).count(), 4);
        assert_eq!(statements(POSTGRES_INIT).count(), 4);
        assert_eq!(statements(SQLITE_DROP).count(), 4);
        assert_eq!(statements(POSTGRES_DROP).count(), 4);
        assert_eq!(statements(SEED).count(), 7);
    }
}
