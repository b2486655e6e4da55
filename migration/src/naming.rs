//! Constraint naming convention.
//!
//! Every package names its indexes and constraints the same way so that
//! migrations of different branches never collide and downgrades can drop
//! constraints by name.

/// `ix_<table>_<column>`
pub fn index(table: &str, column: &str) -> String {
    format!("ix_{}_{}", table, column)
}

/// `uq_<table>_<column>`
pub fn unique(table: &str, column: &str) -> String {
    format!("uq_{}_{}", table, column)
}

/// `ck_<table>_<constraint>`
pub fn check(table: &str, constraint: &str) -> String {
    format!("ck_{}_{}", table, constraint)
}

/// `fk_<table>_<column>_<referred table>`
pub fn foreign_key(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{}_{}_{}", table, column, referred_table)
}

/// `pk_<table>`
pub fn primary_key(table: &str) -> String {
    format!("pk_{}", table)
}
