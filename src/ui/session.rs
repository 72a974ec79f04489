//! # Event loop
//!
//! A session is a plain synchronous cycle:
//!
//! ```text
//! draw (if dirty) -> wait for one input event -> dispatch -> repeat
//! ```
//!
//! Redraws are driven by a dirty flag: dispatch reports whether the event
//! changed anything visible, and unchanged state (an unrecognized sequence,
//! a click on the border, Escape) is not redrawn. The first frame is always
//! drawn.

use crate::ui::app::{MenuModel, StatusKind};
use crate::ui::input::{ByteSource, InputDecoder, InputEvent, MouseEvent, NamedKey};
use crate::ui::item::{ActionHandler, ItemSource};
use crate::ui::render::{render, Layout, RenderFrame};
use crate::ui::theme::Theme;
use anyhow::{Context, Result};
use std::io::Write;

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Unchanged,
    Changed,
    Quit,
}

pub struct Session<'a> {
    model: MenuModel,
    layout: Layout,
    theme: &'a Theme,
    source: &'a mut dyn ItemSource,
    actions: &'a mut dyn ActionHandler,
}

impl<'a> Session<'a> {
    /// The list window follows `layout.page_size`, so drawing and click
    /// mapping always agree on which rows hold items.
    pub fn new(
        mut model: MenuModel,
        layout: Layout,
        theme: &'a Theme,
        source: &'a mut dyn ItemSource,
        actions: &'a mut dyn ActionHandler,
    ) -> Self {
        model.set_page_size(layout.page_size);
        Self {
            model,
            layout,
            theme,
            source,
            actions,
        }
    }

    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The frame for the current state, preview included.
    pub fn frame(&self) -> RenderFrame {
        let preview = self
            .model
            .selected_item()
            .map(|item| self.actions.preview(item))
            .unwrap_or_default();
        render(&self.model, &self.layout, self.theme, &preview)
    }

    /// Run until a quit event or the end of input.
    pub fn run<S: ByteSource, W: Write>(
        &mut self,
        input: &mut InputDecoder<S>,
        out: &mut W,
    ) -> Result<()> {
        let mut dirty = true;
        loop {
            if dirty {
                self.frame()
                    .write_to(out)
                    .context("Failed to draw terminal UI")?;
            }

            let Some(event) = input
                .next_event()
                .context("Failed to read terminal input")?
            else {
                log::info!("input closed, leaving menu");
                return Ok(());
            };
            log::debug!("input event: {:?}", event);

            match self.dispatch(event) {
                Dispatch::Quit => return Ok(()),
                Dispatch::Changed => dirty = true,
                Dispatch::Unchanged => dirty = false,
            }
        }
    }

    /// Apply one decoded event.
    pub fn dispatch(&mut self, event: InputEvent) -> Dispatch {
        let moved = match event {
            InputEvent::Key(b'q' | b'Q' | CTRL_C | CTRL_D) => return Dispatch::Quit,
            InputEvent::Key(b'j') | InputEvent::Named(NamedKey::Down) => {
                self.model.move_relative(1)
            }
            InputEvent::Key(b'k') | InputEvent::Named(NamedKey::Up) => {
                self.model.move_relative(-1)
            }
            InputEvent::Named(NamedKey::PageDown) => self.model.move_page(1),
            InputEvent::Named(NamedKey::PageUp) => self.model.move_page(-1),
            InputEvent::Key(b'g') | InputEvent::Named(NamedKey::Home) => {
                self.model.move_to_edge(false)
            }
            InputEvent::Key(b'G') | InputEvent::Named(NamedKey::End) => {
                self.model.move_to_edge(true)
            }
            InputEvent::Key(b'r') => {
                self.rescan();
                true
            }
            InputEvent::Named(NamedKey::Enter) => return self.activate(),
            InputEvent::Mouse(mouse) => return self.dispatch_mouse(mouse),
            InputEvent::Key(_)
            | InputEvent::Named(
                NamedKey::Left | NamedKey::Right | NamedKey::Escape | NamedKey::Backspace,
            )
            | InputEvent::Unrecognized => false,
        };

        if moved {
            Dispatch::Changed
        } else {
            Dispatch::Unchanged
        }
    }

    fn dispatch_mouse(&mut self, mouse: MouseEvent) -> Dispatch {
        if !mouse.is_press {
            return Dispatch::Unchanged;
        }
        if let Some(delta) = mouse.wheel_delta() {
            return if self.model.scroll_wheel(delta) {
                Dispatch::Changed
            } else {
                Dispatch::Unchanged
            };
        }
        if mouse.is_primary_press()
            && self
                .model
                .select_at(usize::from(mouse.y), self.layout.header_offset())
                .is_some()
        {
            return self.activate();
        }
        Dispatch::Unchanged
    }

    fn activate(&mut self) -> Dispatch {
        match self.model.activate(&mut *self.actions) {
            Some(outcome) if outcome.quit => Dispatch::Quit,
            Some(_) => Dispatch::Changed,
            None => Dispatch::Unchanged,
        }
    }

    fn rescan(&mut self) {
        match self.source.enumerate() {
            Ok(items) => {
                let count = items.len();
                let title = self.source.title().to_string();
                self.model.replace_items(title, items);
                log::info!("rescanned: {} items", count);
                self.model
                    .set_status(StatusKind::Info, format!("Rescanned, {} items", count));
            }
            Err(e) => {
                log::warn!("rescan failed: {:#}", e);
                self.model
                    .set_status(StatusKind::Error, format!("Rescan failed: {:#}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::EdgePolicy;
    use crate::ui::input::ReplayBytes;
    use crate::ui::item::{ActionOutcome, Item};
    use serde_json::json;

    struct FixedSource {
        items: Vec<Item>,
        fail: bool,
    }

    impl ItemSource for FixedSource {
        fn title(&self) -> &str {
            "Fixed"
        }

        fn enumerate(&mut self) -> Result<Vec<Item>> {
            if self.fail {
                anyhow::bail!("catalog vanished");
            }
            Ok(self.items.clone())
        }
    }

    #[derive(Default)]
    struct Recorder {
        applied: Vec<String>,
    }

    impl ActionHandler for Recorder {
        fn apply(&mut self, item: &Item) -> ActionOutcome {
            self.applied.push(item.label.clone());
            if item.action == json!("quit") {
                ActionOutcome::quit()
            } else {
                ActionOutcome::ok(format!("applied {}", item.label))
            }
        }
    }

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::new(format!("item {}", i), json!(i)))
            .collect()
    }

    fn layout() -> Layout {
        Layout {
            inner_width: 40,
            page_size: 10,
            preview_rows: 2,
        }
    }

    fn model(count: usize) -> MenuModel {
        MenuModel::new("Fixed", items(count), layout().page_size, EdgePolicy::Clamp)
    }

    #[test]
    fn test_keys_navigate() {
        let mut source = FixedSource {
            items: items(5),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(5), layout(), theme, &mut source, &mut actions);

        assert_eq!(session.dispatch(InputEvent::Key(b'j')), Dispatch::Changed);
        assert_eq!(
            session.dispatch(InputEvent::Named(NamedKey::Down)),
            Dispatch::Changed
        );
        assert_eq!(session.model().selected_index(), 2);
        assert_eq!(
            session.dispatch(InputEvent::Named(NamedKey::End)),
            Dispatch::Changed
        );
        assert_eq!(session.model().selected_index(), 4);
        assert_eq!(session.dispatch(InputEvent::Key(b'j')), Dispatch::Unchanged);
        assert_eq!(
            session.dispatch(InputEvent::Named(NamedKey::Escape)),
            Dispatch::Unchanged
        );
        assert_eq!(session.dispatch(InputEvent::Key(b'q')), Dispatch::Quit);
    }

    #[test]
    fn test_click_selects_and_activates() {
        let mut source = FixedSource {
            items: items(5),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(5), layout(), theme, &mut source, &mut actions);

        let click = MouseEvent {
            button: 0,
            x: 5,
            y: 7,
            is_press: true,
        };
        assert_eq!(session.dispatch(InputEvent::Mouse(click)), Dispatch::Changed);
        assert_eq!(session.model().selected_index(), 3);
        drop(session);
        assert_eq!(actions.applied, vec!["item 3"]);
    }

    #[test]
    fn test_layout_page_size_governs_clicks() {
        let mut source = FixedSource {
            items: items(12),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let short = Layout {
            page_size: 3,
            ..layout()
        };
        let model = MenuModel::new("Fixed", items(12), 10, EdgePolicy::Clamp);
        let mut session = Session::new(model, short, theme, &mut source, &mut actions);
        assert_eq!(session.model().viewport().page_size, 3);

        // Row 9 is below the three drawn list rows
        let below_list = MouseEvent {
            button: 0,
            x: 5,
            y: 9,
            is_press: true,
        };
        assert_eq!(
            session.dispatch(InputEvent::Mouse(below_list)),
            Dispatch::Unchanged
        );
        assert_eq!(session.model().selected_index(), 0);

        let last_row = MouseEvent { y: 6, ..below_list };
        assert_eq!(
            session.dispatch(InputEvent::Mouse(last_row)),
            Dispatch::Changed
        );
        assert_eq!(session.model().selected_index(), 2);
        drop(session);
        assert_eq!(actions.applied, vec!["item 2"]);
    }

    #[test]
    fn test_release_and_border_clicks_are_ignored() {
        let mut source = FixedSource {
            items: items(5),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(5), layout(), theme, &mut source, &mut actions);

        let release = MouseEvent {
            button: 0,
            x: 5,
            y: 7,
            is_press: false,
        };
        let title_click = MouseEvent {
            button: 0,
            x: 5,
            y: 2,
            is_press: true,
        };
        let filler_click = MouseEvent {
            button: 0,
            x: 5,
            y: 12,
            is_press: true,
        };
        for mouse in [release, title_click, filler_click] {
            assert_eq!(
                session.dispatch(InputEvent::Mouse(mouse)),
                Dispatch::Unchanged
            );
        }
        assert_eq!(session.model().selected_index(), 0);
        drop(session);
        assert!(actions.applied.is_empty());
    }

    #[test]
    fn test_wheel_clamps_at_edges() {
        let mut source = FixedSource {
            items: items(3),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(
            MenuModel::new("Fixed", items(3), 10, EdgePolicy::Wrap),
            layout(),
            theme,
            &mut source,
            &mut actions,
        );
        let wheel = |button| {
            InputEvent::Mouse(MouseEvent {
                button,
                x: 1,
                y: 1,
                is_press: true,
            })
        };

        assert_eq!(session.dispatch(wheel(64)), Dispatch::Unchanged);
        assert_eq!(session.model().selected_index(), 0);
        session.dispatch(wheel(65));
        session.dispatch(wheel(65));
        assert_eq!(session.dispatch(wheel(65)), Dispatch::Unchanged);
        assert_eq!(session.model().selected_index(), 2);
    }

    #[test]
    fn test_rescan_replaces_items_and_reports() {
        let mut source = FixedSource {
            items: items(2),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(5), layout(), theme, &mut source, &mut actions);
        session.dispatch(InputEvent::Named(NamedKey::End));

        assert_eq!(session.dispatch(InputEvent::Key(b'r')), Dispatch::Changed);
        assert_eq!(session.model().item_count(), 2);
        assert_eq!(session.model().selected_index(), 1);
        let status = session.model().status.clone().expect("status set");
        assert_eq!(status.kind, StatusKind::Info);
    }

    #[test]
    fn test_failed_rescan_keeps_items() {
        let mut source = FixedSource {
            items: items(2),
            fail: true,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(5), layout(), theme, &mut source, &mut actions);

        assert_eq!(session.dispatch(InputEvent::Key(b'r')), Dispatch::Changed);
        assert_eq!(session.model().item_count(), 5);
        let status = session.model().status.clone().expect("status set");
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.message.contains("catalog vanished"));
    }

    #[test]
    fn test_quit_action_ends_session() {
        let mut quit_items = items(2);
        quit_items.push(Item::new("Quit", json!("quit")));
        let mut source = FixedSource {
            items: quit_items.clone(),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(
            MenuModel::new("Fixed", quit_items, 10, EdgePolicy::Clamp),
            layout(),
            theme,
            &mut source,
            &mut actions,
        );

        let mut input = InputDecoder::new(ReplayBytes::new(b"G\rj"));
        let mut out = Vec::new();
        session.run(&mut input, &mut out).expect("session runs");
        assert!(!input.source().is_empty(), "trailing input left unread");
        drop(session);
        assert_eq!(actions.applied, vec!["Quit"]);
    }

    #[test]
    fn test_run_redraws_only_on_change() {
        let mut source = FixedSource {
            items: items(3),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(3), layout(), theme, &mut source, &mut actions);

        // initial draw, 'j' redraws, Escape and an unknown sequence do not
        let mut replay = ReplayBytes::new(b"j\x1b");
        replay.pause().push(b"\x1b[Zq");
        let mut input = InputDecoder::new(replay);
        let mut out = Vec::new();
        session.run(&mut input, &mut out).expect("session runs");

        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(text.matches("\x1b[1;1H").count(), 2);
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let mut source = FixedSource {
            items: items(3),
            fail: false,
        };
        let mut actions = Recorder::default();
        let theme = Theme::default_theme();
        let mut session = Session::new(model(3), layout(), theme, &mut source, &mut actions);

        let mut input = InputDecoder::new(ReplayBytes::new(b"jj"));
        let mut out = Vec::new();
        session.run(&mut input, &mut out).expect("session runs");
        assert_eq!(session.model().selected_index(), 2);
    }
}
