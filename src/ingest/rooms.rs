//! Rooms ingestion
//!
//! The upload is an archive holding `index.htm` and one HTML page per
//! building under `campus/discover/buildings-and-classrooms/`. The index
//! table links the buildings to load; each building page carries its name
//! and address in `#building-info` and one table row per room.
//!
//! Coordinates are not resolved here; lat and lon are recorded as 0.

use scraper::{ElementRef, Html, Selector};

use crate::dataset::{DatasetKind, Room};

use super::archive::ArchiveFiles;
use super::errors::{IngestError, IngestResult};

pub const INDEX_FILE: &str = "index.htm";
pub const BUILDINGS_DIR: &str = "campus/discover/buildings-and-classrooms";

const INDEX_LINK_PREFIX: &str = "./campus/discover/buildings-and-classrooms/";
const BUILDING_HREF_BASE: &str = "http://students.ubc.ca/";

/// Parses every valid room out of a campus archive
pub fn parse_rooms(content: &[u8]) -> IngestResult<Vec<Room>> {
    let archive = ArchiveFiles::read(content)?;
    let index = archive.get(INDEX_FILE).ok_or(IngestError::MissingIndex)?;
    let selectors = Selectors::new()?;

    let mut rooms = Vec::new();
    for link in building_links(&String::from_utf8_lossy(index), &selectors) {
        let Some(page) = archive.get(&link) else {
            continue;
        };
        let Some(shortname) = link
            .rsplit('/')
            .next()
            .and_then(|file| file.strip_suffix(".htm"))
        else {
            continue;
        };
        let building = Html::parse_document(&String::from_utf8_lossy(page));
        rooms.extend(parse_building(&building, shortname, &link, &selectors));
    }

    if rooms.is_empty() {
        return Err(IngestError::Empty(DatasetKind::Rooms));
    }
    Ok(rooms)
}

struct Selectors {
    tbody: Selector,
    row: Selector,
    link: Selector,
    building_info: Selector,
    heading: Selector,
    number: Selector,
    capacity: Selector,
    furniture: Selector,
    room_type: Selector,
}

impl Selectors {
    fn new() -> IngestResult<Self> {
        Ok(Self {
            tbody: selector("tbody")?,
            row: selector("tr")?,
            link: selector("a[href]")?,
            building_info: selector("#building-info")?,
            heading: selector("h2")?,
            number: selector("td.views-field-field-room-number")?,
            capacity: selector("td.views-field-field-room-capacity")?,
            furniture: selector("td.views-field-field-room-furniture")?,
            room_type: selector("td.views-field-field-room-type")?,
        })
    }
}

fn selector(css: &'static str) -> IngestResult<Selector> {
    Selector::parse(css)
        .map_err(|e| IngestError::InvalidContent(format!("bad selector '{}': {:?}", css, e)))
}

/// Archive paths of the building pages linked from the index table, deduplicated
fn building_links(index: &str, selectors: &Selectors) -> Vec<String> {
    let document = Html::parse_document(index);
    let Some(table) = document.select(&selectors.tbody).next() else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for anchor in table.select(&selectors.link) {
        let Some(file) = anchor
            .value()
            .attr("href")
            .and_then(|href| href.strip_prefix(INDEX_LINK_PREFIX))
            .filter(|file| file.ends_with(".htm"))
        else {
            continue;
        };
        let path = format!("{}/{}", BUILDINGS_DIR, file);
        if !links.contains(&path) {
            links.push(path);
        }
    }
    links
}

struct Building<'a> {
    shortname: &'a str,
    fullname: String,
    address: String,
    href: String,
}

fn parse_building(document: &Html, shortname: &str, link: &str, selectors: &Selectors) -> Vec<Room> {
    let Some(info) = document.select(&selectors.building_info).next() else {
        return Vec::new();
    };
    let Some(table) = document.select(&selectors.tbody).next() else {
        return Vec::new();
    };

    let fullname = info.select(&selectors.heading).next().map(text_of);
    let address = info
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "div")
        .map(text_of);
    let (Some(fullname), Some(address)) = (fullname, address) else {
        return Vec::new();
    };

    let building = Building {
        shortname,
        fullname,
        address,
        href: format!("{}{}", BUILDING_HREF_BASE, link),
    };
    table
        .select(&selectors.row)
        .filter_map(|row| room_from_row(row, &building, selectors))
        .collect()
}

/// A room, or `None` when the row lacks a number or a numeric capacity
fn room_from_row(row: ElementRef<'_>, building: &Building<'_>, selectors: &Selectors) -> Option<Room> {
    let number_cell = row.select(&selectors.number).next()?;
    let number = text_of(number_cell);
    if number.is_empty() {
        return None;
    }
    let seats: u32 = text_of(row.select(&selectors.capacity).next()?).parse().ok()?;
    let furniture = text_of(row.select(&selectors.furniture).next()?);
    let room_type = text_of(row.select(&selectors.room_type).next()?);
    let href = number_cell
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .unwrap_or_else(|| building.href.clone());

    Some(Room {
        fullname: building.fullname.clone(),
        shortname: building.shortname.to_string(),
        name: format!("{}_{}", building.shortname, number),
        number,
        address: building.address.clone(),
        room_type,
        furniture,
        href,
        lat: 0.0,
        lon: 0.0,
        seats: f64::from(seats),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{
        building_page, index_page, rooms_archive, small_campus, zip_archive, BuildingFixture,
    };

    #[test]
    fn test_parses_linked_buildings() {
        let rooms = parse_rooms(&small_campus()).unwrap();
        assert_eq!(rooms.len(), 2);

        let first = &rooms[0];
        assert_eq!(first.fullname, "Hugh Dempster Pavilion");
        assert_eq!(first.shortname, "DMP");
        assert_eq!(first.number, "110");
        assert_eq!(first.name, "DMP_110");
        assert_eq!(first.address, "6245 Agronomy Road V6T 1Z4");
        assert_eq!(first.room_type, "Tiered Large Group");
        assert_eq!(first.furniture, "Classroom-Fixed Tablets");
        assert_eq!(
            first.href,
            "http://students.ubc.ca/campus/discover/buildings-and-classrooms/room/DMP-110"
        );
        assert_eq!(first.seats, 120.0);
        assert_eq!((first.lat, first.lon), (0.0, 0.0));
        assert_eq!(rooms[1].seats, 40.0);
    }

    #[test]
    fn test_rows_without_capacity_dropped() {
        let content = rooms_archive(&[BuildingFixture {
            shortname: "ANGU",
            fullname: "Henry Angus",
            address: "2053 Main Mall",
            rooms: &[
                ("098", "260", "Classroom-Fixed Tables", "Tiered Large Group"),
                ("232", "", "Classroom-Movable Tables", "Small Group"),
                ("", "16", "Classroom-Movable Tables", "Small Group"),
            ],
        }]);
        let rooms = parse_rooms(&content).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "ANGU_098");
    }

    #[test]
    fn test_unlinked_and_missing_pages_skipped() {
        let linked = BuildingFixture {
            shortname: "DMP",
            fullname: "Hugh Dempster Pavilion",
            address: "6245 Agronomy Road",
            rooms: &[("110", "120", "Fixed", "Tiered")],
        };
        let unlinked = BuildingFixture {
            shortname: "SWNG",
            fullname: "West Mall Swing Space",
            address: "2175 West Mall",
            rooms: &[("121", "187", "Movable", "Open Design")],
        };
        let index = index_page(&["DMP", "GONE"]);
        let dmp = building_page(&linked);
        let swng = building_page(&unlinked);
        let content = zip_archive(&[
            ("index.htm", index.as_str()),
            ("campus/discover/buildings-and-classrooms/DMP.htm", dmp.as_str()),
            ("campus/discover/buildings-and-classrooms/SWNG.htm", swng.as_str()),
        ]);

        let rooms = parse_rooms(&content).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].shortname, "DMP");
    }

    #[test]
    fn test_page_without_building_info_skipped() {
        let index = index_page(&["DMP"]);
        let page = "<html><body><table><tbody><tr><td class=\"views-field-field-room-number\">1</td></tr></tbody></table></body></html>";
        let content = zip_archive(&[
            ("index.htm", index.as_str()),
            ("campus/discover/buildings-and-classrooms/DMP.htm", page),
        ]);
        assert_eq!(
            parse_rooms(&content).unwrap_err(),
            IngestError::Empty(DatasetKind::Rooms)
        );
    }

    #[test]
    fn test_missing_index() {
        let content = zip_archive(&[("campus/discover/buildings-and-classrooms/DMP.htm", "")]);
        assert_eq!(parse_rooms(&content).unwrap_err(), IngestError::MissingIndex);
    }

    #[test]
    fn test_duplicate_links_read_once() {
        let selectors = Selectors::new().unwrap();
        let links = building_links(&index_page(&["DMP"]), &selectors);
        assert_eq!(links, vec!["campus/discover/buildings-and-classrooms/DMP.htm"]);
    }
}
