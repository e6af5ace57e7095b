pub mod backup;
pub mod checklist;
pub mod clock;
pub mod log;
pub mod route;
pub mod session;
