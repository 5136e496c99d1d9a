use migration::entities::{recipe, short_link, user};

use crate::storage::models::{AuthorView, DishView, IngredientLine, ShortLink};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_shortlink(model: short_link::Model) -> ShortLink {
    ShortLink {
        origin_path: model.origin_path,
        token: model.token,
    }
}

pub fn shortlink_to_active_model(link: &ShortLink) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        origin_path: Set(link.origin_path.clone()),
        token: Set(link.token.clone()),
    }
}

/// 由食谱、作者和已解析的配料行组装 DishView
///
/// 负数的烹饪时间 / 数量被折算为 0，交给 ShoppingListBuilder 作为非法数据拒绝。
pub fn assemble_dish_view(
    recipe: &recipe::Model,
    author: &user::Model,
    ingredients: Vec<IngredientLine>,
) -> DishView {
    DishView {
        name: recipe.name.clone(),
        author: AuthorView {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            username: author.username.clone(),
        },
        cooking_time: u32::try_from(recipe.cooking_time).unwrap_or(0),
        text: recipe.text.clone(),
        ingredients,
    }
}
