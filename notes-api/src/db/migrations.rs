use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,

                title TEXT NOT NULL CHECK(length(title) BETWEEN 1 AND 255),
                content TEXT NOT NULL CHECK(length(content) >= 1),

                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            );
        "#
        ),
        M::up(
            r#"
            CREATE TABLE note_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                note_id INTEGER NOT NULL,

                title TEXT NOT NULL,
                content TEXT NOT NULL,

                created_at DATETIME NOT NULL,

                FOREIGN KEY (note_id) REFERENCES notes (id)
            );

            CREATE INDEX note_history_note_id_created_at ON note_history (note_id, created_at);
        "#
        ),
    ]);
}
