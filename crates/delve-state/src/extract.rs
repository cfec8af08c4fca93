//! Extraction rules
//!
//! Positional first, pattern second: numeric fields are found by their
//! fixed HUD labels, monsters by the shape of the panel entries inside a
//! configured region. Rules run in a fixed order and are independent —
//! one absent field never poisons the rest of the snapshot.

use crate::config::ExtractConfig;
use crate::state::{ExtractedState, Location, MarkerHit, Meter, Monster};
use crate::ExtractError;
use regex::Regex;
use tracing::trace;

pub struct Extractor {
    cfg: ExtractConfig,

    vitals: Regex,
    mana: Regex,
    level: Regex,
    location: Regex,

    /// `gg  2 goblins` — several glyphs, a count, a plural name.
    grouped_entry: Regex,

    /// `g   goblin` — one glyph, a run of blanks, the name.
    singular_entry: Regex,

    /// Marker phrases pre-lowered for case-insensitive containment.
    marker_needles: Vec<String>,
}

impl Extractor {
    pub fn new(cfg: ExtractConfig) -> Result<Self, ExtractError> {
        let marker_needles = cfg
            .markers
            .iter()
            .map(|m| m.phrase.to_lowercase())
            .collect();

        Ok(Self {
            vitals: Regex::new(r"(?i)(?:Health|HP)[:\s]\s*(\d+)/(\d+)")?,
            mana: Regex::new(r"(?i)(?:Magic|MP)[:\s]\s*(\d+)/(\d+)")?,
            level: Regex::new(r"(?i)\bXL:\s*(\d+)")?,
            location: Regex::new(r"([A-Za-z]+):(\d+)")?,
            grouped_entry: Regex::new(r"^\s*([A-Za-z]{2,})\s+(\d+)\s+([A-Za-z][A-Za-z '\-]*)")?,
            singular_entry: Regex::new(r"^\s*([A-Za-z])\s{3,}([A-Za-z][A-Za-z '\-]*)")?,
            marker_needles,
            cfg,
        })
    }

    /// Parse one rendered snapshot into typed facts. Total: whatever the
    /// screen does not show stays absent.
    pub fn extract(&self, rows: &[String]) -> ExtractedState {
        let monsters = self.monsters(rows);

        ExtractedState {
            health: self.meter(rows, &self.vitals),
            mana: self.meter(rows, &self.mana),
            level: self.level(rows),
            location: self.location(rows),
            player: self.find_glyph(rows, '@'),
            monsters,
            markers: self.markers(rows),
            game_over: self.game_over(rows),
        }
    }

    fn meter(&self, rows: &[String], pattern: &Regex) -> Option<Meter> {
        rows.iter().find_map(|row| {
            let caps = pattern.captures(row)?;
            Some(Meter {
                current: caps[1].parse().ok()?,
                max: caps[2].parse().ok()?,
            })
        })
    }

    fn level(&self, rows: &[String]) -> Option<i32> {
        rows.iter()
            .find_map(|row| self.level.captures(row)?[1].parse().ok())
    }

    /// First `Branch:depth` pair whose label is not a stat label.
    fn location(&self, rows: &[String]) -> Option<Location> {
        rows.iter().find_map(|row| {
            self.location.captures_iter(row).find_map(|caps| {
                let branch = &caps[1];
                if self
                    .cfg
                    .stat_labels
                    .iter()
                    .any(|label| branch.eq_ignore_ascii_case(label))
                {
                    return None;
                }
                Some(Location {
                    branch: branch.to_string(),
                    depth: caps[2].parse().ok()?,
                })
            })
        })
    }

    /// Scan the monster panel for singular and grouped entries, in screen
    /// order. The denylists weed out message fragments that share the
    /// shape.
    fn monsters(&self, rows: &[String]) -> Vec<Monster> {
        let region = self.cfg.monster_panel;
        let mut found: Vec<Monster> = Vec::new();

        for row in clip_rows(rows, region.top, region.bottom) {
            let slice = clip_cols(row, region.left, region.right);
            if slice.trim().is_empty() {
                continue;
            }

            if let Some(caps) = self.grouped_entry.captures(&slice) {
                let symbols = &caps[1];
                if self.denied_word(symbols) {
                    continue;
                }
                let name = clean_name(&caps[3]);
                if self.accept_name(&name) && !seen(&found, &name) {
                    let count = caps[2].parse().unwrap_or(1);
                    trace!(%name, count, "monster panel: grouped entry");
                    found.push(self.monster(symbols.chars().next().unwrap_or('?'), name, count, rows));
                }
                continue;
            }

            if let Some(caps) = self.singular_entry.captures(&slice) {
                let name = clean_name(&caps[2]);
                if self.accept_name(&name) && !seen(&found, &name) {
                    let symbol = caps[1].chars().next().unwrap_or('?');
                    trace!(%name, %symbol, "monster panel: entry");
                    found.push(self.monster(symbol, name, 1, rows));
                }
            }
        }

        found
    }

    fn monster(&self, symbol: char, name: String, count: u32, rows: &[String]) -> Monster {
        Monster {
            symbol,
            position: self.find_glyph(rows, symbol),
            name,
            count,
        }
    }

    /// First occurrence of a glyph inside the map region, as (row, col).
    fn find_glyph(&self, rows: &[String], glyph: char) -> Option<(u16, u16)> {
        let region = self.cfg.map_region;
        for (row_idx, row) in rows
            .iter()
            .enumerate()
            .skip(region.top as usize)
            .take(region.bottom.saturating_sub(region.top) as usize)
        {
            let hit = row
                .chars()
                .take(region.right as usize)
                .skip(region.left as usize)
                .position(|ch| ch == glyph);
            if let Some(offset) = hit {
                return Some((row_idx as u16, region.left + offset as u16));
            }
        }
        None
    }

    fn markers(&self, rows: &[String]) -> Vec<MarkerHit> {
        let screen = rows.join("\n").to_lowercase();
        self.cfg
            .markers
            .iter()
            .zip(&self.marker_needles)
            .filter(|(_, needle)| screen.contains(needle.as_str()))
            .map(|(phrase, _)| MarkerHit {
                kind: phrase.kind,
                phrase: phrase.phrase.to_string(),
            })
            .collect()
    }

    fn game_over(&self, rows: &[String]) -> bool {
        rows.iter().any(|row| {
            self.cfg
                .game_over_phrases
                .iter()
                .any(|phrase| row.contains(phrase))
        })
    }

    fn accept_name(&self, name: &str) -> bool {
        if name.is_empty() || name.chars().any(|ch| "#.+=~,|-".contains(ch)) {
            return false;
        }
        let lowered = name.to_lowercase();
        if self.cfg.name_denylist.iter().any(|deny| lowered == *deny) {
            return false;
        }
        let first_word = lowered.split_whitespace().next().unwrap_or("");
        !self.cfg.word_denylist.iter().any(|deny| first_word == *deny)
    }

    fn denied_word(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.cfg.word_denylist.iter().any(|deny| lowered == *deny)
    }
}

/// Trim a panel capture down to the monster name: the capture runs until
/// the character class ends, so a wide panel can drag in the next column.
/// Anything after a two-blank gap is not part of the name.
fn clean_name(raw: &str) -> String {
    raw.split("  ").next().unwrap_or("").trim().to_string()
}

fn seen(found: &[Monster], name: &str) -> bool {
    found.iter().any(|m| m.name == name)
}

fn clip_rows(rows: &[String], top: u16, bottom: u16) -> impl Iterator<Item = &String> {
    rows.iter()
        .skip(top as usize)
        .take(bottom.saturating_sub(top) as usize)
}

fn clip_cols(row: &str, left: u16, right: u16) -> String {
    row.chars()
        .take(right as usize)
        .skip(left as usize)
        .collect()
}
