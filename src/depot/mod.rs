pub mod installer;
pub mod organizer;
pub mod scanner;
pub mod watcher;
