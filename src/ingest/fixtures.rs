//! Upload builders shared by unit tests

use std::io::{Cursor, Write};

/// One building page: its file stem, heading, address and room rows
/// `(number, capacity, furniture, type)`
pub struct BuildingFixture<'a> {
    pub shortname: &'a str,
    pub fullname: &'a str,
    pub address: &'a str,
    pub rooms: &'a [(&'a str, &'a str, &'a str, &'a str)],
}

pub fn zip_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, body) in files {
        writer
            .start_file(*path, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn tar_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, body) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, body.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn index_page(shortnames: &[&str]) -> String {
    let rows: String = shortnames
        .iter()
        .map(|code| {
            format!(
                r#"<tr><td class="views-field views-field-field-building-code">{code}</td>
<td class="views-field views-field-title"><a href="./campus/discover/buildings-and-classrooms/{code}.htm">{code} building</a></td>
<td class="views-field views-field-nothing"><a href="./campus/discover/buildings-and-classrooms/{code}.htm">More info</a></td></tr>
"#
            )
        })
        .collect();
    format!(
        "<html><body><table><thead><tr><th>Code</th></tr></thead><tbody>\n{}</tbody></table></body></html>",
        rows
    )
}

pub fn building_page(building: &BuildingFixture<'_>) -> String {
    let rows: String = building
        .rooms
        .iter()
        .map(|(number, capacity, furniture, room_type)| {
            format!(
                r##"<tr><td class="views-field views-field-field-room-number"><a href="http://students.ubc.ca/campus/discover/buildings-and-classrooms/room/{code}-{number}">{number}</a></td>
<td class="views-field views-field-field-room-capacity"> {capacity} </td>
<td class="views-field views-field-field-room-furniture">{furniture}</td>
<td class="views-field views-field-field-room-type">{room_type}</td>
<td class="views-field views-field-nothing"><a href="#">More info</a></td></tr>
"##,
                code = building.shortname,
            )
        })
        .collect();
    format!(
        r#"<html><body>
<div id="building-info"><h2><span class="field-content">{}</span></h2>
<div class="building-field"><div class="field-content">{}</div></div>
<div class="building-field"><div class="field-content">Opening hours: 7:00 AM</div></div></div>
<table><thead><tr><th>Room</th></tr></thead><tbody>
{}</tbody></table></body></html>"#,
        building.fullname, building.address, rows
    )
}

pub fn rooms_archive(buildings: &[BuildingFixture<'_>]) -> Vec<u8> {
    let codes: Vec<&str> = buildings.iter().map(|b| b.shortname).collect();
    let index = index_page(&codes);
    let pages: Vec<(String, String)> = buildings
        .iter()
        .map(|b| {
            (
                format!("campus/discover/buildings-and-classrooms/{}.htm", b.shortname),
                building_page(b),
            )
        })
        .collect();

    let mut files: Vec<(&str, &str)> = vec![("index.htm", index.as_str())];
    files.extend(pages.iter().map(|(p, body)| (p.as_str(), body.as_str())));
    zip_archive(&files)
}

/// Two rooms in one building, the second seating 40
pub fn small_campus() -> Vec<u8> {
    rooms_archive(&[BuildingFixture {
        shortname: "DMP",
        fullname: "Hugh Dempster Pavilion",
        address: "6245 Agronomy Road V6T 1Z4",
        rooms: &[
            ("110", "120", "Classroom-Fixed Tablets", "Tiered Large Group"),
            ("201", "40", "Classroom-Movable Tables & Chairs", "Small Group"),
        ],
    }])
}
