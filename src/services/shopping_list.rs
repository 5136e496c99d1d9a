//! Shopping list service
//!
//! Turns the dishes in a user's cart into a printable grocery list: one
//! section per dish, then a consolidated list keyed by
//! `(name, measurement_unit)`.

use std::collections::HashMap;

use tracing::debug;

use crate::config::MergePolicy;
use crate::errors::{FoodgramError, Result};
use crate::storage::{DishView, IngredientLine};
use crate::utils::pdf::{Font, PdfDocument};

pub const TITLE: &str = "Grocery List";
pub const SUMMARY_HEADING: &str = "Full grocery list:";
pub const INGREDIENTS_HEADING: &str = "Ingredients:";

const MM: f32 = 2.835;

/// `- Salt — 5 g`
pub fn format_ingredient(line: &IngredientLine) -> String {
    format!(
        "- {} — {} {}",
        line.name, line.amount, line.measurement_unit
    )
}

/// One dish as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishSection {
    pub name: String,
    pub author: String,
    pub cooking_time: u32,
    pub description: String,
    pub ingredients: Vec<IngredientLine>,
}

impl DishSection {
    fn from_view(dish: &DishView) -> Self {
        Self {
            name: dish.name.clone(),
            author: dish.author.display_name(),
            cooking_time: dish.cooking_time,
            description: dish.text.clone(),
            ingredients: dish.ingredients.clone(),
        }
    }

    pub fn heading(&self) -> String {
        format!("Recipe: {}", self.name)
    }

    pub fn author_line(&self) -> String {
        format!("Author: {}", self.author)
    }

    pub fn cooking_line(&self) -> String {
        format!("Cooking time: {} min", self.cooking_time)
    }

    pub fn description_line(&self) -> String {
        format!("Description: {}", self.description)
    }
}

/// Composed grocery list, before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    pub sections: Vec<DishSection>,
    pub summary: Vec<IngredientLine>,
}

impl ShoppingList {
    /// All text lines in document order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![TITLE.to_string()];
        for section in &self.sections {
            lines.push(section.heading());
            lines.push(section.author_line());
            lines.push(section.cooking_line());
            lines.push(section.description_line());
            lines.push(INGREDIENTS_HEADING.to_string());
            lines.extend(section.ingredients.iter().map(format_ingredient));
        }
        lines.push(SUMMARY_HEADING.to_string());
        lines.extend(self.summary.iter().map(format_ingredient));
        lines
    }

    /// Plain-text rendering, one line per row.
    pub fn to_text(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(TITLE)?;
        doc.centered(TITLE, Font::Bold, 16.0);
        doc.gap(10.0 * MM);

        for section in &self.sections {
            doc.text(&section.heading(), Font::Bold, 14.0);
            doc.text(&section.author_line(), Font::Regular, 12.0);
            doc.text(&section.cooking_line(), Font::Regular, 12.0);
            doc.text(&section.description_line(), Font::Regular, 12.0);
            doc.gap(5.0 * MM);
            doc.text(INGREDIENTS_HEADING, Font::Bold, 12.0);
            for line in &section.ingredients {
                doc.text(&format_ingredient(line), Font::Regular, 12.0);
            }
            doc.gap(10.0 * MM);
        }

        doc.gap(10.0 * MM);
        doc.text(SUMMARY_HEADING, Font::Bold, 14.0);
        for line in &self.summary {
            doc.text(&format_ingredient(line), Font::Regular, 12.0);
        }

        doc.to_bytes()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShoppingListBuilder {
    merge_policy: MergePolicy,
}

impl ShoppingListBuilder {
    pub fn new(merge_policy: MergePolicy) -> Self {
        Self { merge_policy }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Validate the dishes and lay out sections and summary.
    ///
    /// Any malformed dish fails the whole list.
    pub fn compose(&self, dishes: &[DishView]) -> Result<ShoppingList> {
        for (index, dish) in dishes.iter().enumerate() {
            validate_dish(index, dish)?;
        }

        let sections = dishes.iter().map(DishSection::from_view).collect();

        let mut summary: Vec<IngredientLine> = Vec::new();
        let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
        for line in dishes.iter().flat_map(|d| d.ingredients.iter()) {
            let key = (line.name.as_str(), line.measurement_unit.as_str());
            match seen.get(&key) {
                None => {
                    seen.insert(key, summary.len());
                    summary.push(line.clone());
                }
                Some(&idx) => match self.merge_policy {
                    MergePolicy::FirstSeen => {}
                    MergePolicy::Sum => {
                        let entry = &mut summary[idx];
                        entry.amount = entry.amount.checked_add(line.amount).ok_or_else(|| {
                            FoodgramError::validation(format!(
                                "Total amount of {} ({}) is too large",
                                line.name, line.measurement_unit
                            ))
                        })?;
                    }
                },
            }
        }

        Ok(ShoppingList { sections, summary })
    }

    /// Compose and render to PDF bytes.
    pub fn build(&self, dishes: &[DishView]) -> Result<Vec<u8>> {
        let list = self.compose(dishes)?;
        let bytes = list.render_pdf()?;
        debug!(
            "Shopping list built: {} dishes, {} summary lines, {} bytes ({} merge)",
            list.sections.len(),
            list.summary.len(),
            bytes.len(),
            self.merge_policy
        );
        Ok(bytes)
    }
}

fn validate_dish(index: usize, dish: &DishView) -> Result<()> {
    let fail = |what: &str| -> Result<()> {
        Err(FoodgramError::validation(format!(
            "Dish #{} ({:?}): {}",
            index + 1,
            dish.name,
            what
        )))
    };

    if dish.name.trim().is_empty() {
        return fail("name is empty");
    }
    if dish.author.username.trim().is_empty() {
        return fail("author username is empty");
    }
    for line in &dish.ingredients {
        if line.name.trim().is_empty() {
            return fail("ingredient name is empty");
        }
        if line.measurement_unit.trim().is_empty() {
            return fail("measurement unit is empty");
        }
        if line.amount == 0 {
            return fail("ingredient amount must be at least 1");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AuthorView;

    fn dish(name: &str, ingredients: Vec<IngredientLine>) -> DishView {
        DishView {
            name: name.to_string(),
            author: AuthorView {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                username: "ab".to_string(),
            },
            cooking_time: 20,
            text: "desc".to_string(),
            ingredients,
        }
    }

    fn soup() -> DishView {
        dish(
            "Soup",
            vec![
                IngredientLine::new("Salt", "g", 5),
                IngredientLine::new("Water", "ml", 500),
            ],
        )
    }

    #[test]
    fn test_single_dish_layout() {
        let list = ShoppingListBuilder::default().compose(&[soup()]).unwrap();
        assert_eq!(
            list.lines(),
            vec![
                "Grocery List",
                "Recipe: Soup",
                "Author: A B (ab)",
                "Cooking time: 20 min",
                "Description: desc",
                "Ingredients:",
                "- Salt — 5 g",
                "- Water — 500 ml",
                "Full grocery list:",
                "- Salt — 5 g",
                "- Water — 500 ml",
            ]
        );
    }

    #[test]
    fn test_first_seen_wins() {
        let dishes = [
            dish("Soup", vec![IngredientLine::new("Salt", "g", 5)]),
            dish("Stew", vec![IngredientLine::new("Salt", "g", 10)]),
        ];
        let list = ShoppingListBuilder::new(MergePolicy::FirstSeen)
            .compose(&dishes)
            .unwrap();
        assert_eq!(list.summary, vec![IngredientLine::new("Salt", "g", 5)]);
        assert_eq!(list.sections.len(), 2);
        assert_eq!(list.sections[1].ingredients[0].amount, 10);
    }

    #[test]
    fn test_sum_policy_adds_amounts() {
        let dishes = [
            dish("Soup", vec![IngredientLine::new("Salt", "g", 5)]),
            dish("Stew", vec![IngredientLine::new("Salt", "g", 10)]),
        ];
        let list = ShoppingListBuilder::new(MergePolicy::Sum)
            .compose(&dishes)
            .unwrap();
        assert_eq!(list.summary, vec![IngredientLine::new("Salt", "g", 15)]);
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let dishes = [dish(
            "Cake",
            vec![
                IngredientLine::new("Sugar", "g", 100),
                IngredientLine::new("Sugar", "tbsp", 2),
            ],
        )];
        let list = ShoppingListBuilder::default().compose(&dishes).unwrap();
        assert_eq!(list.summary.len(), 2);
    }

    #[test]
    fn test_summary_keeps_encounter_order() {
        let dishes = [
            dish("One", vec![IngredientLine::new("Milk", "ml", 200)]),
            dish(
                "Two",
                vec![
                    IngredientLine::new("Eggs", "pcs", 2),
                    IngredientLine::new("Milk", "ml", 100),
                    IngredientLine::new("Flour", "g", 300),
                ],
            ),
        ];
        let list = ShoppingListBuilder::default().compose(&dishes).unwrap();
        let names: Vec<&str> = list.summary.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Eggs", "Flour"]);
    }

    #[test]
    fn test_empty_cart() {
        let builder = ShoppingListBuilder::default();
        let list = builder.compose(&[]).unwrap();
        assert_eq!(list.lines(), vec!["Grocery List", "Full grocery list:"]);

        let pdf = builder.build(&[]).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_malformed_dishes_are_rejected() {
        let builder = ShoppingListBuilder::default();

        let mut nameless = soup();
        nameless.name = "  ".to_string();
        assert!(matches!(
            builder.compose(&[nameless]),
            Err(FoodgramError::Validation(_))
        ));

        let zero = dish("Soup", vec![IngredientLine::new("Salt", "g", 0)]);
        assert!(matches!(
            builder.build(&[soup(), zero]),
            Err(FoodgramError::Validation(_))
        ));

        let unitless = dish("Soup", vec![IngredientLine::new("Salt", "", 1)]);
        assert!(builder.compose(&[unitless]).is_err());
    }

    /// Glyph ids of `text` in the bundled face, as printpdf writes them.
    fn shown(text: &str, font: Font) -> Vec<u8> {
        let face = ttf_parser::Face::parse(font.data(), 0).unwrap();
        let mut hex = String::from("<");
        for c in text.chars() {
            hex.push_str(&format!("{:04X}", face.glyph_index(c).unwrap().0));
        }
        hex.push_str("> Tj");
        hex.into_bytes()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_pdf_contains_ingredient_lines() {
        let pdf = ShoppingListBuilder::default().build(&[soup()]).unwrap();
        assert!(contains(&pdf, &shown("- Salt — 5 g", Font::Regular)));
        assert!(contains(&pdf, &shown("Recipe: Soup", Font::Bold)));
    }

    #[test]
    fn test_cyrillic_text_survives_into_pdf() {
        let borscht = DishView {
            name: "Борщ".to_string(),
            author: AuthorView {
                first_name: "Иван".to_string(),
                last_name: "Петров".to_string(),
                username: "ivan".to_string(),
            },
            cooking_time: 90,
            text: "Варить на медленном огне".to_string(),
            ingredients: vec![IngredientLine::new("Свёкла", "г", 300)],
        };

        let list = ShoppingListBuilder::default()
            .compose(std::slice::from_ref(&borscht))
            .unwrap();
        let lines = list.lines();
        assert!(lines.contains(&"Recipe: Борщ".to_string()));
        assert!(lines.contains(&"Author: Иван Петров (ivan)".to_string()));
        assert_eq!(
            lines.iter().filter(|l| *l == "- Свёкла — 300 г").count(),
            2
        );

        let pdf = list.render_pdf().unwrap();
        assert!(contains(&pdf, b"/Identity-H"));
        assert!(contains(&pdf, &shown("Recipe: Борщ", Font::Bold)));
        assert!(contains(&pdf, &shown("Author: Иван Петров (ivan)", Font::Regular)));
        assert!(contains(&pdf, &shown("Description: Варить на медленном огне", Font::Regular)));
        assert!(contains(&pdf, &shown("- Свёкла — 300 г", Font::Regular)));
        // 没有被替换成问号
        assert!(!contains(&pdf, &shown("- ?????? — 300 ?", Font::Regular)));
    }
}
