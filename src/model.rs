use html_escape::decode_html_entities;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

/// Shown in place of a recipe title when the API returned none.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled recipe";

/// A recipe as returned by the extraction API.
///
/// Every field is optional: the vendor omits whatever it could not find on
/// the page, and a missing field must never fail decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub servings: Option<u32>,
    pub ready_in_minutes: Option<u32>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    /// HTML fragment
    pub summary: Option<String>,
    /// HTML fragment
    pub instructions: Option<String>,
    pub extended_ingredients: Vec<Ingredient>,
    pub dish_types: Vec<String>,
    pub cuisines: Vec<String>,
    pub diets: Vec<String>,
    pub vegetarian: Option<bool>,
    pub vegan: Option<bool>,
    pub gluten_free: Option<bool>,
    pub dairy_free: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// The ingredient line as written on the source page
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl Recipe {
    /// The title to show for this recipe, or [`UNTITLED_PLACEHOLDER`].
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNTITLED_PLACEHOLDER,
        }
    }

    /// The summary with markup removed.
    pub fn summary_text(&self) -> Option<String> {
        self.summary.as_deref().map(html_to_text)
    }

    /// The instructions with markup removed.
    pub fn instructions_text(&self) -> Option<String> {
        self.instructions.as_deref().map(html_to_text)
    }

    /// Ingredient lines in API order, preferring the original wording.
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.extended_ingredients
            .iter()
            .filter_map(|i| i.original.clone().or_else(|| i.name.clone()))
            .collect()
    }
}

/// Elements that start a new line of text when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "br", "li", "ul", "ol", "div", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td",
];

/// Strip tags from an HTML fragment and normalize whitespace.
///
/// Inline markup is dropped without adding spaces; block elements become a
/// single space.
fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let mut text = String::new();
    for node in document.root_element().descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if BLOCK_ELEMENTS.contains(&e.name()) => text.push(' '),
            _ => {}
        }
    }
    // Some sources double-encode entities, so decode once more after parsing
    let decoded = decode_html_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
