//! Pages: layout attributes plus three independently rooted regions.

use crate::region::{Position, RegionContent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageRectangle {
    Letter,
    Tabloid,
    Legal,
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
}

impl PageRectangle {
    /// Portrait size in millimetres (width, height)
    pub fn size_mm(self) -> (f64, f64) {
        match self {
            PageRectangle::Letter => (215.9, 279.4),
            PageRectangle::Tabloid => (279.4, 431.8),
            PageRectangle::Legal => (215.9, 355.6),
            PageRectangle::A0 => (841.0, 1189.0),
            PageRectangle::A1 => (594.0, 841.0),
            PageRectangle::A2 => (420.0, 594.0),
            PageRectangle::A3 => (297.0, 420.0),
            PageRectangle::A4 => (210.0, 297.0),
            PageRectangle::A5 => (148.0, 210.0),
            PageRectangle::A6 => (105.0, 148.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// Size, orientation, margins and default typography of a page.
///
/// Field names follow the persisted snapshot (`mTopHeader`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rectangle: PageRectangle,
    pub orientation: PageOrientation,

    pub m_top: f64,
    pub m_right: f64,
    pub m_bottom: f64,
    pub m_left: f64,

    pub default_page_root_font: String,
    pub default_page_root_font_size: f64,
    pub default_page_root_font_color: String,
    pub default_page_root_background_color: String,

    pub m_top_header: f64,
    pub m_right_header: f64,
    pub m_bottom_header: f64,
    pub m_left_header: f64,
    pub hide_header_on_first_page: bool,

    pub m_top_footer: f64,
    pub m_right_footer: f64,
    pub m_bottom_footer: f64,
    pub m_left_footer: f64,
    pub hide_footer_on_first_page: bool,

    pub m_top_body: f64,
    pub m_right_body: f64,
    pub m_bottom_body: f64,
    pub m_left_body: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            name: None,
            rectangle: PageRectangle::A4,
            orientation: PageOrientation::Portrait,
            m_top: 50.0,
            m_right: 40.0,
            m_bottom: 50.0,
            m_left: 40.0,
            default_page_root_font: "simfang".to_string(),
            default_page_root_font_size: 10.0,
            default_page_root_font_color: "#000000".to_string(),
            default_page_root_background_color: "#00000000".to_string(),
            m_top_header: 15.0,
            m_right_header: 15.0,
            m_bottom_header: 15.0,
            m_left_header: 15.0,
            hide_header_on_first_page: false,
            m_top_footer: 15.0,
            m_right_footer: 15.0,
            m_bottom_footer: 15.0,
            m_left_footer: 15.0,
            hide_footer_on_first_page: false,
            m_top_body: 15.0,
            m_right_body: 15.0,
            m_bottom_body: 15.0,
            m_left_body: 15.0,
        }
    }
}

impl PageLayout {
    /// Outer page margin
    pub fn page_margin_mut(&mut self, side: MarginSide) -> &mut f64 {
        match side {
            MarginSide::Top => &mut self.m_top,
            MarginSide::Right => &mut self.m_right,
            MarginSide::Bottom => &mut self.m_bottom,
            MarginSide::Left => &mut self.m_left,
        }
    }

    /// Margin of one region inside the page
    pub fn region_margin_mut(&mut self, position: Position, side: MarginSide) -> &mut f64 {
        match (position, side) {
            (Position::Header, MarginSide::Top) => &mut self.m_top_header,
            (Position::Header, MarginSide::Right) => &mut self.m_right_header,
            (Position::Header, MarginSide::Bottom) => &mut self.m_bottom_header,
            (Position::Header, MarginSide::Left) => &mut self.m_left_header,
            (Position::Body, MarginSide::Top) => &mut self.m_top_body,
            (Position::Body, MarginSide::Right) => &mut self.m_right_body,
            (Position::Body, MarginSide::Bottom) => &mut self.m_bottom_body,
            (Position::Body, MarginSide::Left) => &mut self.m_left_body,
            (Position::Footer, MarginSide::Top) => &mut self.m_top_footer,
            (Position::Footer, MarginSide::Right) => &mut self.m_right_footer,
            (Position::Footer, MarginSide::Bottom) => &mut self.m_bottom_footer,
            (Position::Footer, MarginSide::Left) => &mut self.m_left_footer,
        }
    }

    /// Page size in millimetres after applying orientation
    pub fn size_mm(&self) -> (f64, f64) {
        let (width, height) = self.rectangle.size_mm();
        match self.orientation {
            PageOrientation::Portrait => (width, height),
            PageOrientation::Landscape => (height, width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(flatten)]
    pub layout: PageLayout,
    #[serde(rename = "pageHeaderContent")]
    pub header: RegionContent,
    #[serde(rename = "pageBodyContent")]
    pub body: RegionContent,
    #[serde(rename = "pageFooterContent")]
    pub footer: RegionContent,
}

impl Page {
    /// Page with default layout and three empty regions
    pub fn blank(id: impl Into<String>) -> Self {
        Self::with_layout(id, PageLayout::default())
    }

    pub fn with_layout(id: impl Into<String>, layout: PageLayout) -> Self {
        Self {
            id: id.into(),
            layout,
            header: RegionContent::new(Position::Header),
            body: RegionContent::new(Position::Body),
            footer: RegionContent::new(Position::Footer),
        }
    }

    pub fn region(&self, position: Position) -> &RegionContent {
        match position {
            Position::Header => &self.header,
            Position::Body => &self.body,
            Position::Footer => &self.footer,
        }
    }

    pub fn region_mut(&mut self, position: Position) -> &mut RegionContent {
        match position {
            Position::Header => &mut self.header,
            Position::Body => &mut self.body,
            Position::Footer => &mut self.footer,
        }
    }
}
