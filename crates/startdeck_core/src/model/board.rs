//! Section/Link records and the ordered board state.
//!
//! # Responsibility
//! - Hold the authoritative section order and per-section link order.
//! - Enforce the per-section link capacity on every move and insert.
//! - Classify container fill for the add-affordance and drop rules.
//!
//! # Invariants
//! - Section order and each section's link order are explicit sequences; the
//!   rendering surface mirrors them, never the other way around between sync
//!   points.
//! - A cross-section move into a full container is rejected before any state
//!   changes; same-section reorder is always allowed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned opaque section identifier.
pub type SectionId = String;

/// Backend-assigned opaque link identifier.
pub type LinkId = String;

/// Hard per-section link cap.
pub const LINK_CAPACITY: usize = 10;

/// Count at which a section is flagged as nearly full.
pub const NEAR_FULL_THRESHOLD: usize = 9;

/// Errors from board order/capacity mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Target section does not exist on this board.
    SectionNotFound(SectionId),
    /// Target link does not exist on this board.
    LinkNotFound(LinkId),
    /// Requested position is past the end of the target sequence.
    PositionOutOfRange { index: usize, len: usize },
    /// Cross-section move into a container already at capacity.
    SectionFull(SectionId),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::LinkNotFound(id) => write!(f, "link not found: {id}"),
            Self::PositionOutOfRange { index, len } => {
                write!(f, "position {index} out of range for length {len}")
            }
            Self::SectionFull(id) => {
                write!(f, "section {id} already holds {LINK_CAPACITY} links")
            }
        }
    }
}

impl Error for BoardError {}

/// Fill classification for one section's link container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillLevel {
    /// No links; the add affordance is always visible.
    Empty,
    /// Below the near-full threshold.
    HasRoom,
    /// One slot left; cosmetic warning only.
    NearFull,
    /// At capacity; rejects incoming cross-section drops.
    Full,
}

impl FillLevel {
    /// Classifies a link count against the capacity thresholds.
    pub fn from_count(count: usize) -> Self {
        if count >= LINK_CAPACITY {
            Self::Full
        } else if count >= NEAR_FULL_THRESHOLD {
            Self::NearFull
        } else if count == 0 {
            Self::Empty
        } else {
            Self::HasRoom
        }
    }

    /// Returns whether incoming cross-section drops must be rejected.
    pub fn rejects_incoming(self) -> bool {
        self == Self::Full
    }
}

/// One bookmark entry belonging to a single section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Stable opaque id.
    pub id: LinkId,
    /// User-facing label.
    pub name: String,
    /// Absolute, scheme-qualified URL.
    pub url: String,
    /// Optional display color (`#RGB`/`#RRGGBB`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A named, orderable group of links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Stable opaque id.
    pub id: SectionId,
    /// User-facing name.
    pub display_name: String,
    /// Links in rendered order.
    pub links: Vec<Link>,
}

impl Section {
    /// Creates an empty section, the shape returned by the add endpoint.
    pub fn new(id: impl Into<SectionId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            links: Vec::new(),
        }
    }

    /// Returns this container's fill classification.
    pub fn fill_level(&self) -> FillLevel {
        FillLevel::from_count(self.links.len())
    }

    /// Returns link ids in rendered order.
    pub fn link_order(&self) -> Vec<LinkId> {
        self.links.iter().map(|link| link.id.clone()).collect()
    }
}

/// Result of one applied link move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMove {
    /// Container the link left.
    pub origin: SectionId,
    /// Container the link landed in.
    pub destination: SectionId,
    /// Whether the move crossed containers.
    pub crossed: bool,
}

/// The whole startpage: sections in rendered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    sections: Vec<Section>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from pre-ordered sections, as rendered at page load.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Returns section ids in rendered order.
    pub fn section_order(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    /// Returns one section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Returns the fill classification for one section.
    pub fn fill_level(&self, id: &str) -> Option<FillLevel> {
        self.section(id).map(Section::fill_level)
    }

    /// Returns the section currently owning one link.
    pub fn owner_of(&self, link_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.links.iter().any(|link| link.id == link_id))
    }

    /// Returns one link by id.
    pub fn link(&self, link_id: &str) -> Option<&Link> {
        self.sections
            .iter()
            .flat_map(|s| s.links.iter())
            .find(|link| link.id == link_id)
    }

    /// Appends a section at the end of the rail.
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Removes one section and everything in it.
    pub fn remove_section(&mut self, id: &str) -> Result<Section, BoardError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| BoardError::SectionNotFound(id.to_string()))?;
        Ok(self.sections.remove(index))
    }

    /// Renames one section.
    pub fn rename_section(&mut self, id: &str, name: &str) -> Result<(), BoardError> {
        let section = self
            .section_mut(id)
            .ok_or_else(|| BoardError::SectionNotFound(id.to_string()))?;
        section.display_name = name.to_string();
        Ok(())
    }

    /// Moves one section to a new rail position.
    pub fn move_section(&mut self, id: &str, to_index: usize) -> Result<(), BoardError> {
        let from = self
            .sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| BoardError::SectionNotFound(id.to_string()))?;
        if to_index >= self.sections.len() {
            return Err(BoardError::PositionOutOfRange {
                index: to_index,
                len: self.sections.len(),
            });
        }
        let section = self.sections.remove(from);
        self.sections.insert(to_index, section);
        Ok(())
    }

    /// Appends one link at the end of a section's container.
    pub fn append_link(&mut self, section_id: &str, link: Link) -> Result<(), BoardError> {
        let section = self
            .section_mut(section_id)
            .ok_or_else(|| BoardError::SectionNotFound(section_id.to_string()))?;
        if section.links.len() >= LINK_CAPACITY {
            return Err(BoardError::SectionFull(section_id.to_string()));
        }
        section.links.push(link);
        Ok(())
    }

    /// Removes one link from whichever section owns it.
    pub fn remove_link(&mut self, link_id: &str) -> Result<(Link, SectionId), BoardError> {
        for section in &mut self.sections {
            if let Some(index) = section.links.iter().position(|link| link.id == link_id) {
                let owner = section.id.clone();
                return Ok((section.links.remove(index), owner));
            }
        }
        Err(BoardError::LinkNotFound(link_id.to_string()))
    }

    /// Replaces name/url/color of one link.
    pub fn update_link(
        &mut self,
        link_id: &str,
        name: &str,
        url: &str,
        color: Option<&str>,
    ) -> Result<(), BoardError> {
        for section in &mut self.sections {
            if let Some(link) = section.links.iter_mut().find(|link| link.id == link_id) {
                link.name = name.to_string();
                link.url = url.to_string();
                link.color = color.map(str::to_string);
                return Ok(());
            }
        }
        Err(BoardError::LinkNotFound(link_id.to_string()))
    }

    /// Moves one link to a position inside a destination section.
    ///
    /// Same-section moves are always accepted. Cross-section moves are
    /// rejected with [`BoardError::SectionFull`] when the destination is at
    /// capacity, leaving the board untouched.
    pub fn move_link(
        &mut self,
        link_id: &str,
        dest_section: &str,
        dest_index: usize,
    ) -> Result<LinkMove, BoardError> {
        let origin = self
            .owner_of(link_id)
            .map(|s| s.id.clone())
            .ok_or_else(|| BoardError::LinkNotFound(link_id.to_string()))?;
        let crossed = origin != dest_section;

        let dest = self
            .section(dest_section)
            .ok_or_else(|| BoardError::SectionNotFound(dest_section.to_string()))?;
        if crossed && dest.fill_level().rejects_incoming() {
            return Err(BoardError::SectionFull(dest_section.to_string()));
        }
        // Valid positions span the destination as it will look after the move.
        let dest_len = dest.links.len() + usize::from(crossed);
        if dest_index >= dest_len {
            return Err(BoardError::PositionOutOfRange {
                index: dest_index,
                len: dest_len,
            });
        }

        let (link, _) = self.remove_link(link_id)?;
        let dest = match self.section_mut(dest_section) {
            Some(section) => section,
            None => return Err(BoardError::SectionNotFound(dest_section.to_string())),
        };
        let clamped = dest_index.min(dest.links.len());
        dest.links.insert(clamped, link);

        Ok(LinkMove {
            origin,
            destination: dest_section.to_string(),
            crossed,
        })
    }
}
