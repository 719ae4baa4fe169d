//! Record types for the two dataset kinds
//!
//! Records are immutable and always fully populated; ingestion discards rows
//! that cannot fill every field.

use serde::{Deserialize, Serialize};

use super::kind::{DatasetKind, Field, RoomField, SectionField};

/// A single course section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub dept: String,
    pub id: String,
    pub instructor: String,
    pub title: String,
    pub uuid: String,
    pub avg: f64,
    pub pass: f64,
    pub fail: f64,
    pub audit: f64,
    pub year: f64,
}

impl Section {
    pub fn number(&self, field: SectionField) -> Option<f64> {
        match field {
            SectionField::Avg => Some(self.avg),
            SectionField::Pass => Some(self.pass),
            SectionField::Fail => Some(self.fail),
            SectionField::Audit => Some(self.audit),
            SectionField::Year => Some(self.year),
            _ => None,
        }
    }

    pub fn text(&self, field: SectionField) -> Option<&str> {
        match field {
            SectionField::Dept => Some(&self.dept),
            SectionField::Id => Some(&self.id),
            SectionField::Instructor => Some(&self.instructor),
            SectionField::Title => Some(&self.title),
            SectionField::Uuid => Some(&self.uuid),
            _ => None,
        }
    }
}

/// A single campus room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub fullname: String,
    pub shortname: String,
    pub number: String,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub furniture: String,
    pub href: String,
    pub lat: f64,
    pub lon: f64,
    pub seats: f64,
}

impl Room {
    pub fn number(&self, field: RoomField) -> Option<f64> {
        match field {
            RoomField::Lat => Some(self.lat),
            RoomField::Lon => Some(self.lon),
            RoomField::Seats => Some(self.seats),
            _ => None,
        }
    }

    pub fn text(&self, field: RoomField) -> Option<&str> {
        match field {
            RoomField::Fullname => Some(&self.fullname),
            RoomField::Shortname => Some(&self.shortname),
            RoomField::Number => Some(&self.number),
            RoomField::Name => Some(&self.name),
            RoomField::Address => Some(&self.address),
            RoomField::Type => Some(&self.room_type),
            RoomField::Furniture => Some(&self.furniture),
            RoomField::Href => Some(&self.href),
            _ => None,
        }
    }
}

/// Borrowed view of a single field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

/// A row of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Section(Section),
    Room(Room),
}

impl Record {
    pub fn kind(&self) -> DatasetKind {
        match self {
            Record::Section(_) => DatasetKind::Sections,
            Record::Room(_) => DatasetKind::Rooms,
        }
    }

    /// Numeric value of `field`, or `None` if the field is textual or of the other kind
    pub fn number(&self, field: Field) -> Option<f64> {
        match (self, field) {
            (Record::Section(s), Field::Section(f)) => s.number(f),
            (Record::Room(r), Field::Room(f)) => r.number(f),
            _ => None,
        }
    }

    /// Text value of `field`, or `None` if the field is numeric or of the other kind
    pub fn text(&self, field: Field) -> Option<&str> {
        match (self, field) {
            (Record::Section(s), Field::Section(f)) => s.text(f),
            (Record::Room(r), Field::Room(f)) => r.text(f),
            _ => None,
        }
    }

    pub fn value(&self, field: Field) -> Option<FieldValue<'_>> {
        if field.is_numeric() {
            self.number(field).map(FieldValue::Number)
        } else {
            self.text(field).map(FieldValue::Text)
        }
    }
}

impl From<Section> for Record {
    fn from(section: Section) -> Self {
        Record::Section(section)
    }
}

impl From<Room> for Record {
    fn from(room: Room) -> Self {
        Record::Room(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> Section {
        Section {
            dept: "cpsc".into(),
            id: "310".into(),
            instructor: "smith, jane".into(),
            title: "intro sw eng".into(),
            uuid: "1234".into(),
            avg: 78.5,
            pass: 120.0,
            fail: 4.0,
            audit: 1.0,
            year: 2015.0,
        }
    }

    #[test]
    fn test_typed_access() {
        let record = Record::from(section());
        assert_eq!(record.number(Field::Section(SectionField::Avg)), Some(78.5));
        assert_eq!(record.text(Field::Section(SectionField::Dept)), Some("cpsc"));
        assert_eq!(record.number(Field::Section(SectionField::Dept)), None);
        assert_eq!(record.text(Field::Section(SectionField::Avg)), None);
    }

    #[test]
    fn test_cross_kind_access_is_none() {
        let record = Record::from(section());
        assert_eq!(record.value(Field::Room(RoomField::Seats)), None);
    }

    #[test]
    fn test_value_dispatches_on_type() {
        let record = Record::from(section());
        assert_eq!(
            record.value(Field::Section(SectionField::Year)),
            Some(FieldValue::Number(2015.0))
        );
        assert_eq!(
            record.value(Field::Section(SectionField::Id)),
            Some(FieldValue::Text("310"))
        );
    }

    #[test]
    fn test_room_serializes_type_field() {
        let room = Room {
            fullname: "Hugh Dempster Pavilion".into(),
            shortname: "DMP".into(),
            number: "110".into(),
            name: "DMP_110".into(),
            address: "6245 Agronomy Road V6T 1Z4".into(),
            room_type: "Tiered Large Group".into(),
            furniture: "Classroom-Fixed Tablets".into(),
            href: "http://example.test/DMP-110".into(),
            lat: 49.26125,
            lon: -123.24807,
            seats: 120.0,
        };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["type"], "Tiered Large Group");
    }
}
