use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CSS selectors locating everything the engine decorates.
///
/// Card part selectors are matched inside each card; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Selectors", inline)]
#[serde(default)]
pub struct SelectorOptions {
    /// Scope every other query runs in.
    pub root: String,
    /// Top-level sections revealed on a stagger.
    pub sections: String,
    /// Any other revealable element.
    pub reveal: String,
    /// Buttons receiving press feedback and ripples.
    pub buttons: String,
    /// Images that fade in on load.
    pub images: String,
    /// Cards receiving the cascade and lift.
    pub cards: String,
    /// A card's primary image.
    pub card_image: String,
    /// A card's tagline.
    pub tagline: String,
    /// A card's heading.
    pub heading: String,
    /// A card's body text.
    pub text: String,
    /// A card's action button.
    pub card_button: String,
    /// A card's chevron indicator.
    pub chevron: String,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            root: "body".to_owned(),
            sections: "#Home_Desktop > div".to_owned(),
            reveal: ".reveal".to_owned(),
            buttons: "button".to_owned(),
            images: "img".to_owned(),
            cards: "[id^=\"Card\"], [id^=\"Product\"], #Column_1, #Column_2, \
                    #Column_3, #Column_4, #Column_5, #Column_6"
                .to_owned(),
            card_image: "img".to_owned(),
            tagline: "[id^=\"Tagline\"]".to_owned(),
            heading: "[id^=\"Heading\"]".to_owned(),
            text: "[id^=\"Text\"]".to_owned(),
            card_button: "button".to_owned(),
            chevron: "[id^=\"chevron\"], [id^=\"chevron_right\"]".to_owned(),
        }
    }
}
