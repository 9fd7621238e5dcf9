//! Course domain module.
//!
//! - `aggregate` - Course entity and the admin-submitted payload
//! - `errors` - CourseError returned by course creation

mod aggregate;
mod errors;

pub use aggregate::{Course, NewCourse, MAX_PRICE_CENTS, MAX_SLUG_LEN, MAX_TITLE_LEN};
pub use errors::CourseError;
