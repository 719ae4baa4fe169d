//! Campus upload builders shared by the integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};

/// `(number, capacity, furniture, type)`
pub type RoomRow<'a> = (&'a str, &'a str, &'a str, &'a str);

pub fn zip_archive(files: &[(String, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, body) in files {
        writer
            .start_file(path.as_str(), zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Zip with `index.htm` linking one page per building
pub fn campus_archive(buildings: &[(&str, &str, &str, &[RoomRow<'_>])]) -> Vec<u8> {
    let links: String = buildings
        .iter()
        .map(|(code, ..)| {
            format!(
                "<tr><td><a href=\"./campus/discover/buildings-and-classrooms/{code}.htm\">{code}</a></td></tr>\n"
            )
        })
        .collect();
    let mut files = vec![(
        "index.htm".to_string(),
        format!("<html><body><table><tbody>\n{}</tbody></table></body></html>", links),
    )];

    for (code, fullname, address, rooms) in buildings {
        let rows: String = rooms
            .iter()
            .map(|(number, capacity, furniture, room_type)| {
                format!(
                    "<tr><td class=\"views-field-field-room-number\"><a href=\"http://example.com/{code}-{number}\">{number}</a></td>\
                     <td class=\"views-field-field-room-capacity\">{capacity}</td>\
                     <td class=\"views-field-field-room-furniture\">{furniture}</td>\
                     <td class=\"views-field-field-room-type\">{room_type}</td></tr>\n"
                )
            })
            .collect();
        files.push((
            format!("campus/discover/buildings-and-classrooms/{}.htm", code),
            format!(
                "<html><body><div id=\"building-info\"><h2>{}</h2><div>{}</div></div>\
                 <table><tbody>\n{}</tbody></table></body></html>",
                fullname, address, rows
            ),
        ));
    }
    zip_archive(&files)
}

/// Hugh Dempster Pavilion with rooms 110 (120 seats) and 201 (40 seats)
pub fn dempster() -> Vec<u8> {
    campus_archive(&[(
        "DMP",
        "Hugh Dempster Pavilion",
        "6245 Agronomy Road V6T 1Z4",
        &[
            ("110", "120", "Classroom-Fixed Tablets", "Tiered Large Group"),
            ("201", "40", "Classroom-Movable Tables &amp; Chairs", "Small Group"),
        ],
    )])
}
