use crate::models::{Toy, ToyForm, ToyId};
use minijinja::Environment;
use serde::Serialize;

const BOARD_TEMPLATE: &str = include_str!("../templates/board.html");
const BOARD_TEMPLATE_NAME: &str = "board.html";

/// Snapshot of everything the page shows.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BoardView {
    pub form_visible: bool,
    pub form_display: &'static str,
    pub form: ToyForm,
    pub cards: Vec<CardView>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: ToyId,
    // Percent-encoded id for use as a single path segment.
    pub id_segment: String,
    pub name: String,
    pub image: String,
    pub likes: u64,
    pub likes_label: String,
}

impl CardView {
    pub fn from_toy(toy: &Toy) -> Self {
        Self {
            id: toy.id.clone(),
            id_segment: urlencoding::encode(toy.id.as_str()).into_owned(),
            name: toy.name.clone(),
            image: toy.image.clone(),
            likes: toy.likes,
            likes_label: likes_label(toy.likes),
        }
    }
}

pub fn likes_label(likes: u64) -> String {
    format!("{likes} Likes")
}

/// Renders the board page. The `.html` template name turns on HTML escaping.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(BOARD_TEMPLATE_NAME, BOARD_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &BoardView) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(BOARD_TEMPLATE_NAME)?;
        tmpl.render(view)
    }
}
