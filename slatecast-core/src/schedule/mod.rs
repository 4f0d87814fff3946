pub mod binder;
pub mod map;
pub mod prefs;
pub mod record;
