//! Field vocabulary per dataset kind
//!
//! Each kind defines a closed set of bare field names, each either numeric
//! (mfield) or textual (sfield). Queries reference them as `<id>_<name>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two supported dataset flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Academic course sections
    Sections,
    /// Campus rooms
    Rooms,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Rooms => "rooms",
        }
    }

    /// Returns every field of this kind, in declaration order
    pub fn fields(&self) -> Vec<Field> {
        match self {
            DatasetKind::Sections => SectionField::ALL.iter().copied().map(Field::Section).collect(),
            DatasetKind::Rooms => RoomField::ALL.iter().copied().map(Field::Room).collect(),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sections" => Ok(DatasetKind::Sections),
            "rooms" => Ok(DatasetKind::Rooms),
            other => Err(format!("Unknown dataset kind '{}'", other)),
        }
    }
}

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    Text,
}

/// Fields of a course section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionField {
    Dept,
    Id,
    Instructor,
    Title,
    Uuid,
    Avg,
    Pass,
    Fail,
    Audit,
    Year,
}

impl SectionField {
    pub const ALL: [SectionField; 10] = [
        SectionField::Dept,
        SectionField::Id,
        SectionField::Instructor,
        SectionField::Title,
        SectionField::Uuid,
        SectionField::Avg,
        SectionField::Pass,
        SectionField::Fail,
        SectionField::Audit,
        SectionField::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionField::Dept => "dept",
            SectionField::Id => "id",
            SectionField::Instructor => "instructor",
            SectionField::Title => "title",
            SectionField::Uuid => "uuid",
            SectionField::Avg => "avg",
            SectionField::Pass => "pass",
            SectionField::Fail => "fail",
            SectionField::Audit => "audit",
            SectionField::Year => "year",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            SectionField::Avg
            | SectionField::Pass
            | SectionField::Fail
            | SectionField::Audit
            | SectionField::Year => FieldType::Numeric,
            _ => FieldType::Text,
        }
    }
}

/// Fields of a campus room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomField {
    Fullname,
    Shortname,
    Number,
    Name,
    Address,
    Type,
    Furniture,
    Href,
    Lat,
    Lon,
    Seats,
}

impl RoomField {
    pub const ALL: [RoomField; 11] = [
        RoomField::Fullname,
        RoomField::Shortname,
        RoomField::Number,
        RoomField::Name,
        RoomField::Address,
        RoomField::Type,
        RoomField::Furniture,
        RoomField::Href,
        RoomField::Lat,
        RoomField::Lon,
        RoomField::Seats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoomField::Fullname => "fullname",
            RoomField::Shortname => "shortname",
            RoomField::Number => "number",
            RoomField::Name => "name",
            RoomField::Address => "address",
            RoomField::Type => "type",
            RoomField::Furniture => "furniture",
            RoomField::Href => "href",
            RoomField::Lat => "lat",
            RoomField::Lon => "lon",
            RoomField::Seats => "seats",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            RoomField::Lat | RoomField::Lon | RoomField::Seats => FieldType::Numeric,
            _ => FieldType::Text,
        }
    }
}

/// A field of either dataset kind, resolved once at validation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Section(SectionField),
    Room(RoomField),
}

impl Field {
    /// Resolves a bare field name within the vocabulary of `kind`
    pub fn parse(kind: DatasetKind, bare: &str) -> Option<Field> {
        match kind {
            DatasetKind::Sections => SectionField::ALL
                .iter()
                .find(|f| f.name() == bare)
                .map(|f| Field::Section(*f)),
            DatasetKind::Rooms => RoomField::ALL
                .iter()
                .find(|f| f.name() == bare)
                .map(|f| Field::Room(*f)),
        }
    }

    /// Bare field name (no dataset prefix)
    pub fn name(&self) -> &'static str {
        match self {
            Field::Section(f) => f.name(),
            Field::Room(f) => f.name(),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            Field::Section(_) => DatasetKind::Sections,
            Field::Room(_) => DatasetKind::Rooms,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Section(f) => f.field_type(),
            Field::Room(f) => f.field_type(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.field_type() == FieldType::Numeric
    }

    /// Externally visible key, e.g. `sections_avg`
    pub fn qualified(&self, dataset_id: &str) -> String {
        format!("{}_{}", dataset_id, self.name())
    }
}
