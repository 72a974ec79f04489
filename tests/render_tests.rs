//! Rendering tests
//!
//! Frames are replayed into a virtual terminal so the assertions are about
//! what a user would actually see, including where rows land on screen.

use boxmenu::ui::{render, EdgePolicy, Item, Layout, MenuModel, RenderFrame, StatusKind, Theme};
use serde_json::json;

const ROWS: u16 = 30;
const COLS: u16 = 80;

fn create_model(count: usize) -> MenuModel {
    let items = (0..count)
        .map(|i| Item::new(format!("Item {:02}", i), json!(i)).with_secondary("detail"))
        .collect();
    MenuModel::new("Test Menu", items, layout().page_size, EdgePolicy::Clamp)
}

fn layout() -> Layout {
    Layout {
        inner_width: 40,
        page_size: 10,
        preview_rows: 2,
    }
}

fn frame_for(model: &MenuModel) -> RenderFrame {
    render(model, &layout(), Theme::default_theme(), &[])
}

fn draw(parser: &mut vt100::Parser, frame: &RenderFrame) {
    let mut bytes = Vec::new();
    frame.write_to(&mut bytes).expect("write to vec");
    parser.process(&bytes);
}

fn screen_rows(parser: &vt100::Parser) -> Vec<String> {
    parser.screen().rows(0, COLS).collect()
}

#[test]
fn test_title_and_first_item_rows() {
    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    draw(&mut parser, &frame_for(&create_model(5)));
    let rows = screen_rows(&parser);

    assert!(rows[0].starts_with('┌'));
    assert!(rows[1].contains("Test Menu"));
    assert!(rows[2].starts_with('├'));
    let first_list_row = layout().header_offset() - 1;
    assert!(rows[first_list_row].contains("Item 00"), "{:?}", rows);
}

#[test]
fn test_click_rows_match_drawn_items() {
    let mut model = create_model(30);
    model.move_page(1);
    model.move_page(1);

    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    draw(&mut parser, &frame_for(&model));
    let rows = screen_rows(&parser);

    for visual_row in 1..=ROWS as usize {
        let mut probe = model.clone();
        match probe.select_at(visual_row, layout().header_offset()) {
            Some(index) => {
                let label = &probe.items()[index].label;
                assert!(
                    rows[visual_row - 1].contains(label.as_str()),
                    "row {} should show {}: {:?}",
                    visual_row,
                    label,
                    rows[visual_row - 1]
                );
            }
            None => assert!(
                !rows[visual_row - 1].contains("Item "),
                "row {} shows an item but is not clickable",
                visual_row
            ),
        }
    }
}

#[test]
fn test_selected_row_is_highlighted() {
    let mut model = create_model(5);
    model.move_relative(2);

    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    draw(&mut parser, &frame_for(&model));
    let screen = parser.screen();
    let selected_row = (layout().header_offset() - 1 + 2) as u16;
    let other_row = selected_row - 1;

    let selected = screen.cell(selected_row, 5).expect("cell in range");
    let other = screen.cell(other_row, 5).expect("cell in range");
    assert!(selected.bold());
    assert_ne!(selected.bgcolor(), vt100::Color::Default);
    assert_eq!(other.bgcolor(), vt100::Color::Default);
    assert_eq!(screen.cell(selected_row, 2).expect("cell").contents(), "▸");
}

#[test]
fn test_box_edges_line_up() {
    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    draw(&mut parser, &frame_for(&create_model(12)));
    let screen = parser.screen();
    let right = (layout().inner_width + 1) as u16;

    // Every row of the box, footer excluded
    let box_rows = layout().frame_height(12) - 1;
    for row in 0..box_rows as u16 {
        let left = screen.cell(row, 0).expect("cell").contents();
        let edge = screen.cell(row, right).expect("cell").contents();
        assert!(["┌", "│", "├", "└"].contains(&left), "row {}: {:?}", row, left);
        assert!(["┐", "│", "┤", "┘"].contains(&edge), "row {}: {:?}", row, edge);
    }
}

#[test]
fn test_redraw_leaves_no_residue() {
    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    let mut model = create_model(12);
    draw(&mut parser, &frame_for(&model));
    assert!(parser.screen().contents().contains("↓ 2"));

    model.replace_items("Shorter", (0..2).map(|i| Item::new(format!("N{}", i), json!(i))).collect());
    model.set_status(StatusKind::Success, "done");
    draw(&mut parser, &frame_for(&model));

    let contents = parser.screen().contents();
    assert!(!contents.contains("Item "), "{}", contents);
    assert!(!contents.contains("↓ "));
    assert!(contents.contains("Shorter"));
    assert!(contents.contains("✔"));
    let height = layout().frame_height(2);
    assert!(screen_rows(&parser)[height..].iter().all(|row| row.trim().is_empty()));
}

#[test]
fn test_frame_height_is_stable_between_frames() {
    let mut model = create_model(3);
    let first = frame_for(&model).lines().len();
    model.move_relative(1);
    model.set_status(StatusKind::Error, "failed\nwith details");
    assert_eq!(frame_for(&model).lines().len(), first);
}

#[test]
fn test_multiline_catalog_text_stays_inside_its_row() {
    let items = vec![
        Item::new("Firefox\nfloat", json!(0)).with_secondary("a\tb"),
        Item::new("Second", json!(1)),
        Item::new("Third", json!(2)),
    ];
    let model = MenuModel::new("Rules", items, layout().page_size, EdgePolicy::Clamp);
    let preview = vec!["+ rule a\nrule b".to_string()];

    let mut parser = vt100::Parser::new(ROWS, COLS, 0);
    draw(&mut parser, &render(&model, &layout(), Theme::default_theme(), &preview));
    let screen = parser.screen();
    let rows = screen_rows(&parser);
    let right = (layout().inner_width + 1) as u16;

    let box_rows = layout().frame_height(3) - 1;
    for row in 0..box_rows as u16 {
        let edge = screen.cell(row, right).expect("cell").contents();
        assert!(["┐", "│", "┤", "┘"].contains(&edge), "row {}: {:?}", row, rows[row as usize]);
    }

    // Items stay on the rows clicks map to
    let first = layout().header_offset() - 1;
    assert!(rows[first].contains("Firefox⏎float"), "{:?}", rows);
    assert!(rows[first + 1].contains("Second"), "{:?}", rows);
    assert!(rows[first + 2].contains("Third"), "{:?}", rows);

    let preview_row = first + layout().page_size + 1;
    assert!(rows[preview_row].contains("+ rule a⏎rule b"), "{:?}", rows);
    assert!(!rows.iter().any(|row| row.trim_start().starts_with("rule b")));
}
