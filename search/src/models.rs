use serde::{Deserialize, Serialize};

/// A tag in the catalogue hierarchy. `parent_tag_id` is nullable; roots
/// have no parent. `recipe_ids` is the junction relation, denormalized by
/// the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
    pub parent_tag_id: Option<i64>,
    #[serde(default)]
    pub recipe_ids: Vec<i64>,
}

/// A recipe as delivered by the data layer, with its tags denormalized.
/// `ingredients` is newline-delimited text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Tag {
    pub fn new(id: i64, name: &str, parent_tag_id: Option<i64>) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
            parent_tag_id,
            recipe_ids: Vec::new(),
        }
    }
}

impl Recipe {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id: Some(id),
            title: title.to_string(),
            description: None,
            ingredients: String::new(),
            instructions: String::new(),
            prep_time: None,
            cook_time: None,
            servings: None,
            tags: Vec::new(),
        }
    }
}
