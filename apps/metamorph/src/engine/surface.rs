//! # Terminal Surface
//!
//! The ANSI-terminal implementation of the core `Surface` trait.
//!
//! The surface is a property sink: it stores the widget's presentation
//! state and echoes changes to stdout as they land. The stage card is
//! drawn when the container tag set is replaced (the last mutation of a
//! render); status lines and transition effects are echoed as one-liners;
//! the progress bar redraws in place with a carriage return.

use metamorph_core::{StyleTag, Surface};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Width of the progress bar in cells.
const BAR_WIDTH: usize = 24;

/// Terminal-backed presentation surface.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    name: String,
    stage_label: String,
    image_ref: String,
    container_tags: BTreeSet<StyleTag>,
    image_tags: BTreeSet<StyleTag>,
    status: String,
    trigger_enabled: bool,
    trigger_label: String,
    progress_visible: bool,
    progress_permille: u16,
}

impl TerminalSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the trigger is currently accepting input.
    #[must_use]
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    fn draw_stage_card(&self) {
        let tags: Vec<&str> = self.container_tags.iter().map(StyleTag::as_str).collect();
        println!();
        println!("  ◇ {} — {}", self.name, self.stage_label);
        println!("    image: {}", self.image_ref);
        println!("    tags:  {}", tags.join(" "));
    }

    fn draw_effect(&self, text: &str) {
        println!("    ~ {}", text);
    }

    fn draw_progress_bar(&self) {
        let filled = usize::from(self.progress_permille) * BAR_WIDTH / 1000;
        let empty = BAR_WIDTH.saturating_sub(filled);
        print!(
            "\r    [{}{}] {:3}%",
            "#".repeat(filled),
            "-".repeat(empty),
            usize::from(self.progress_permille) / 10
        );
        let _ = io::stdout().flush();
    }

    fn clear_progress_line(&self) {
        // Overwrite the in-place bar with blanks, then return the cursor.
        print!("\r{}\r", " ".repeat(BAR_WIDTH + 12));
        let _ = io::stdout().flush();
        println!();
    }
}

impl Surface for TerminalSurface {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_stage_label(&mut self, label: &str) {
        self.stage_label = label.to_string();
    }

    fn set_image(&mut self, image_ref: &str) {
        self.image_ref = image_ref.to_string();
    }

    fn replace_container_tags(&mut self, tags: &BTreeSet<StyleTag>) {
        self.container_tags = tags.clone();
        self.draw_stage_card();
    }

    fn add_container_tag(&mut self, tag: StyleTag) {
        self.draw_effect(&format!("+{}", tag));
        self.container_tags.insert(tag);
    }

    fn remove_container_tag(&mut self, tag: &StyleTag) {
        if self.container_tags.remove(tag) {
            self.draw_effect(&format!("-{}", tag));
        }
    }

    fn add_image_tag(&mut self, tag: StyleTag) {
        self.draw_effect(&format!("image +{}", tag));
        self.image_tags.insert(tag);
    }

    fn remove_image_tag(&mut self, tag: &StyleTag) {
        if self.image_tags.remove(tag) {
            self.draw_effect(&format!("image -{}", tag));
        }
    }

    fn commit(&mut self) {
        // The terminal analog of a forced reflow: everything echoed so far
        // must be on screen before the next tag lands.
        let _ = io::stdout().flush();
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        println!("  » {}", self.status);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }

    fn set_trigger_label(&mut self, label: &str) {
        if self.trigger_label != label {
            self.trigger_label = label.to_string();
            println!("  [ {} ]", self.trigger_label);
        }
    }

    fn show_progress(&mut self) {
        self.progress_visible = true;
    }

    fn set_progress_permille(&mut self, permille: u16) {
        self.progress_permille = permille;
        if self.progress_visible {
            self.draw_progress_bar();
        }
    }

    fn hide_progress(&mut self) {
        if self.progress_visible {
            self.progress_visible = false;
            self.clear_progress_line();
        }
    }
}
