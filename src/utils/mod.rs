pub mod dicts;
