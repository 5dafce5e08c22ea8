mod command;
pub mod recipe;
pub mod shopping;

pub use command::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    /// Both sides share one pool. Use the struct literal to split reads and writes.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
