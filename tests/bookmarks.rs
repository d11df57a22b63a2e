#![cfg(feature = "bookmarks")]

use contracts_plan_pdf::{fonts, plan, plan_builder};
use lopdf::{Document, Object};

fn outline_titles(document: &Document) -> (i64, Vec<String>) {
    let catalog = document.catalog().expect("catalog");
    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("outline reference");
    let outlines = document.get_dictionary(outlines_id).expect("outline root");
    let count = outlines
        .get(b"Count")
        .and_then(Object::as_i64)
        .expect("outline count");

    let mut titles = Vec::new();
    let mut next = outlines.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        let entry = document.get_dictionary(id).expect("outline entry");
        let title = entry
            .get(b"Title")
            .and_then(Object::as_str)
            .expect("outline title");
        titles.push(String::from_utf8_lossy(title).into_owned());
        next = entry.get(b"Next").and_then(Object::as_reference).ok();
    }
    (count, titles)
}

#[test]
fn outline_lists_every_section() {
    if !fonts::fonts_available() {
        eprintln!("Skipping outline_lists_every_section: no font family available.");
        return;
    }

    let rendered = plan_builder()
        .render_with_bookmarks()
        .expect("render with bookmarks");
    let document = Document::load_mem(&rendered.bytes).expect("parse output");

    let (count, titles) = outline_titles(&document);
    let expected: Vec<String> = plan::sections()
        .iter()
        .map(|section| section.title().to_string())
        .collect();

    assert_eq!(count, 13);
    assert_eq!(titles, expected);
}

#[test]
fn outline_entries_point_at_section_pages() {
    if !fonts::fonts_available() {
        eprintln!("Skipping outline_entries_point_at_section_pages: no font family available.");
        return;
    }

    let rendered = plan_builder()
        .render_with_bookmarks()
        .expect("render with bookmarks");
    let document = Document::load_mem(&rendered.bytes).expect("parse output");
    let pages = document.get_pages();

    let catalog = document.catalog().expect("catalog");
    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("outline reference");
    let first_id = document
        .get_dictionary(outlines_id)
        .and_then(|outlines| outlines.get(b"First"))
        .and_then(Object::as_reference)
        .expect("first entry");
    let destination = document
        .get_dictionary(first_id)
        .and_then(|entry| entry.get(b"Dest"))
        .and_then(Object::as_array)
        .expect("destination");

    let first_page = rendered.section_pages[0].page.expect("placed") as u32;
    let page_ref = destination[0].as_reference().expect("page reference");
    assert_eq!(pages.get(&first_page), Some(&page_ref));
}
