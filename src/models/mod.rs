pub mod checklist;
pub mod driver;
pub mod route_stop;
pub mod work_session;
