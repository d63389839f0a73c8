//! Adaptive Card 文档模型
//!
//! 每种节点一个变体，序列化时由 `type` 字段区分，结构错误在构造时就会暴露，
//! 而不是等到序列化。模板通过 [`template`] 每次返回全新的树，共享定义本身不可变。

pub mod builder;
pub mod chart;
pub mod table;

use serde::Serialize;

pub use builder::{BuildOptions, CardBuilder};
pub use chart::{ChartUrlProvider, QuickChartProvider};
pub use table::{create_table_row, format_percentage, RowStyle};

pub const CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
pub const DEFAULT_CARD_VERSION: &str = "1.6";
const CARD_WIDTH: &str = "Full";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextSize {
    Small,
    Default,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextWeight {
    Lighter,
    Default,
    Bolder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextColor {
    Default,
    Good,
    Attention,
    Warning,
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStyle {
    Default,
    Emphasis,
    Good,
    Attention,
    Warning,
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Spacing {
    None,
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillMode {
    Cover,
    RepeatHorizontally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageSize {
    Auto,
    Stretch,
    Medium,
    Large,
}

/// 卡片 body 中的节点
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CardElement {
    Container(Container),
    TextBlock(TextBlock),
    ColumnSet(ColumnSet),
    Table(Table),
    Image(Image),
}

impl CardElement {
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            CardElement::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            CardElement::TextBlock(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<TextWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subtle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: TextSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn weight(mut self, weight: TextWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn color(mut self, color: TextColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn subtle(mut self) -> Self {
        self.is_subtle = Some(true);
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }
}

impl From<TextBlock> for CardElement {
    fn from(block: TextBlock) -> Self {
        CardElement::TextBlock(block)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    pub url: String,
    pub fill_mode: FillMode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub items: Vec<CardElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ContainerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<bool>,
}

impl Container {
    pub fn new(items: Vec<CardElement>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }
}

impl From<Container> for CardElement {
    fn from(container: Container) -> Self {
        CardElement::Container(container)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Column {
    pub width: String,
    pub items: Vec<CardElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSet {
    pub columns: Vec<Column>,
}

impl From<ColumnSet> for CardElement {
    fn from(set: ColumnSet) -> Self {
        CardElement::ColumnSet(set)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumnDefinition {
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableCell {
    pub items: Vec<CardElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ContainerStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub columns: Vec<TableColumnDefinition>,
    pub rows: Vec<TableRow>,
    pub first_row_as_header: bool,
}

impl From<Table> for CardElement {
    fn from(table: Table) -> Self {
        CardElement::Table(table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
}

impl From<Image> for CardElement {
    fn from(image: Image) -> Self {
        CardElement::Image(image)
    }
}

/// 卡片底部按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CardAction {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mentioned {
    pub id: String,
    pub name: String,
}

/// Teams `<at>` 提及实体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "mention")]
pub struct MentionEntity {
    pub text: String,
    pub mentioned: Mentioned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MsTeamsProperties {
    pub width: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<MentionEntity>,
}

/// Adaptive Card 根文档
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub body: Vec<CardElement>,
    pub msteams: MsTeamsProperties,
    pub actions: Vec<CardAction>,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
}

/// Returns a fresh, independently owned copy of the base card.
pub fn template() -> CardDocument {
    CardDocument {
        kind: "AdaptiveCard".to_string(),
        body: Vec::new(),
        msteams: MsTeamsProperties {
            width: CARD_WIDTH.to_string(),
            entities: Vec::new(),
        },
        actions: Vec::new(),
        schema: CARD_SCHEMA.to_string(),
        version: DEFAULT_CARD_VERSION.to_string(),
    }
}
