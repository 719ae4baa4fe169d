//! Dataset and record model for insightdb
//!
//! Two dataset kinds are supported, each with a closed field vocabulary:
//!
//! - Sections: numeric {avg, pass, fail, audit, year}; textual {dept, id, instructor, title, uuid}
//! - Rooms: numeric {lat, lon, seats}; textual {fullname, shortname, number, name, address, type, furniture, href}
//!
//! Records carry no behavior beyond typed field access.

mod dataset;
mod kind;
mod record;

pub use dataset::{is_valid_id, Dataset, DatasetSummary};
pub use kind::{DatasetKind, Field, FieldType, RoomField, SectionField};
pub use record::{FieldValue, Record, Room, Section};
