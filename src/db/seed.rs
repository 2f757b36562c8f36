//! Default product catalog
//!
//! Seeding is explicit and idempotent: products whose name already exists
//! are left untouched.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use super::connection::DbResult;

/// (name, kcal, protein, carbs, fat, category), all per 100 g
pub type SeedProduct = (&'static str, f64, f64, f64, f64, &'static str);

const BREAD: &str = "Bread & Bakery";
const GRAINS: &str = "Grains";
const MEAT: &str = "Meat & Poultry";
const FISH: &str = "Fish & Seafood";
const DAIRY: &str = "Dairy & Eggs";
const VEGETABLES: &str = "Vegetables";
const FRUITS: &str = "Fruits & Berries";
const NUTS: &str = "Nuts & Seeds";
const LEGUMES: &str = "Legumes";
const OILS: &str = "Oils & Fats";
const READY_MEALS: &str = "Ready Meals";
const DRINKS: &str = "Drinks";

pub const DEFAULT_CATALOG: &[SeedProduct] = &[
    ("White Bread", 265.0, 8.1, 48.8, 3.2, BREAD),
    ("Rye Bread", 214.0, 6.6, 33.5, 1.2, BREAD),
    ("Sliced Loaf", 264.0, 7.5, 50.9, 2.9, BREAD),
    ("Thin Lavash", 277.0, 7.9, 47.6, 4.2, BREAD),
    ("Croissant", 406.0, 8.2, 42.8, 21.0, BREAD),
    ("Poppy Seed Bun", 336.0, 7.8, 51.4, 11.3, BREAD),
    ("Raisin Bun", 316.0, 7.2, 55.5, 8.9, BREAD),
    ("Cabbage Pie", 235.0, 5.8, 34.5, 8.8, BREAD),
    ("Meat Pie", 256.0, 8.1, 32.4, 11.2, BREAD),
    ("Apple Pie", 199.0, 4.7, 33.4, 5.6, BREAD),
    ("Cheburek", 274.0, 8.7, 29.0, 14.6, BREAD),
    ("Donut", 296.0, 5.8, 38.8, 13.3, BREAD),
    ("Oatmeal Cookies", 437.0, 6.5, 71.4, 14.1, BREAD),
    ("Shortbread Cookies", 458.0, 6.5, 76.8, 15.4, BREAD),
    ("Wafers", 425.0, 8.2, 65.1, 14.6, BREAD),
    ("Gingerbread", 364.0, 4.8, 77.7, 2.8, BREAD),
    ("Sponge Cake", 344.0, 4.7, 84.4, 4.3, BREAD),
    ("Eclair", 336.0, 6.0, 26.0, 24.0, BREAD),
    ("Boiled Rice", 116.0, 2.2, 22.8, 0.5, GRAINS),
    ("Boiled Buckwheat", 92.0, 3.4, 17.1, 0.8, GRAINS),
    ("Oatmeal on Water", 88.0, 3.0, 15.0, 1.7, GRAINS),
    ("Boiled Pearl Barley", 109.0, 3.1, 22.2, 0.4, GRAINS),
    ("Boiled Millet", 90.0, 3.0, 17.0, 0.7, GRAINS),
    ("Boiled Pasta", 112.0, 3.5, 23.0, 0.4, GRAINS),
    ("Boiled Bulgur", 83.0, 3.1, 14.1, 0.2, GRAINS),
    ("Boiled Quinoa", 120.0, 4.4, 21.3, 1.9, GRAINS),
    ("Chicken Breast", 165.0, 31.0, 0.0, 3.6, MEAT),
    ("Chicken Thigh", 185.0, 16.8, 0.0, 12.8, MEAT),
    ("Chicken Wings", 186.0, 19.3, 0.0, 12.0, MEAT),
    ("Chicken Liver", 140.0, 20.4, 0.7, 5.9, MEAT),
    ("Lean Beef", 158.0, 22.2, 0.0, 7.1, MEAT),
    ("Beef Liver", 127.0, 17.9, 5.3, 3.7, MEAT),
    ("Lean Pork", 142.0, 20.9, 0.0, 6.1, MEAT),
    ("Pork Ribs", 321.0, 16.0, 0.0, 29.0, MEAT),
    ("Turkey Breast", 84.0, 19.2, 0.0, 0.7, MEAT),
    ("Veal", 90.0, 19.7, 0.0, 1.2, MEAT),
    ("Lamb", 203.0, 16.3, 0.0, 15.3, MEAT),
    ("Duck", 337.0, 16.5, 0.0, 30.6, MEAT),
    ("Rabbit", 183.0, 21.0, 0.0, 11.0, MEAT),
    ("Ham", 279.0, 22.6, 0.0, 20.9, MEAT),
    ("Boiled Sausage", 257.0, 13.7, 0.0, 22.8, MEAT),
    ("Frankfurters", 266.0, 10.1, 1.5, 23.9, MEAT),
    ("Bacon", 500.0, 23.0, 0.0, 45.0, MEAT),
    ("Salmon", 142.0, 19.8, 0.0, 6.3, FISH),
    ("Cod", 78.0, 17.7, 0.0, 0.7, FISH),
    ("Canned Tuna", 96.0, 23.0, 0.0, 0.6, FISH),
    ("Shrimp", 87.0, 18.9, 0.8, 1.1, FISH),
    ("Pollock", 72.0, 15.9, 0.0, 0.9, FISH),
    ("Mackerel", 181.0, 18.0, 0.0, 13.2, FISH),
    ("Herring", 161.0, 17.7, 0.0, 11.4, FISH),
    ("Milk 3.2%", 58.0, 2.8, 4.7, 3.2, DAIRY),
    ("Milk 1.5%", 44.0, 2.8, 4.7, 1.5, DAIRY),
    ("Goat Milk", 68.0, 3.0, 4.5, 4.2, DAIRY),
    ("Kefir 2.5%", 51.0, 2.8, 4.0, 2.5, DAIRY),
    ("Cottage Cheese 5%", 121.0, 17.2, 1.8, 5.0, DAIRY),
    ("Cottage Cheese 9%", 159.0, 16.7, 2.0, 9.0, DAIRY),
    ("Fat-Free Cottage Cheese", 71.0, 16.7, 1.3, 0.1, DAIRY),
    ("Sour Cream 20%", 206.0, 2.8, 3.2, 20.0, DAIRY),
    ("Cream 10%", 118.0, 3.0, 4.0, 10.0, DAIRY),
    ("Natural Yogurt", 66.0, 5.0, 3.5, 3.2, DAIRY),
    ("Ryazhenka", 54.0, 2.9, 4.2, 2.5, DAIRY),
    ("Hard Cheese", 364.0, 23.2, 0.0, 30.0, DAIRY),
    ("Mozzarella", 280.0, 28.0, 4.9, 17.1, DAIRY),
    ("Parmesan", 392.0, 38.0, 0.0, 28.0, DAIRY),
    ("Gouda", 356.0, 25.0, 2.2, 27.4, DAIRY),
    ("Feta", 264.0, 14.2, 4.1, 21.3, DAIRY),
    ("Chicken Egg", 155.0, 12.7, 0.7, 10.9, DAIRY),
    ("Egg White", 44.0, 11.1, 0.0, 0.0, DAIRY),
    ("Egg Yolk", 352.0, 16.2, 1.0, 31.2, DAIRY),
    ("Boiled Potatoes", 82.0, 2.0, 16.3, 0.4, VEGETABLES),
    ("Carrot", 35.0, 1.3, 6.9, 0.1, VEGETABLES),
    ("White Cabbage", 27.0, 1.8, 4.7, 0.1, VEGETABLES),
    ("Cucumber", 15.0, 0.8, 2.8, 0.1, VEGETABLES),
    ("Tomato", 20.0, 1.1, 3.7, 0.2, VEGETABLES),
    ("Onion", 47.0, 1.4, 8.2, 0.0, VEGETABLES),
    ("Bell Pepper", 27.0, 1.3, 5.3, 0.1, VEGETABLES),
    ("Broccoli", 28.0, 3.0, 4.0, 0.4, VEGETABLES),
    ("Beetroot", 40.0, 1.5, 8.8, 0.1, VEGETABLES),
    ("Zucchini", 24.0, 0.6, 4.6, 0.3, VEGETABLES),
    ("Eggplant", 24.0, 1.2, 4.5, 0.1, VEGETABLES),
    ("Spinach", 22.0, 2.9, 2.0, 0.3, VEGETABLES),
    ("Cauliflower", 30.0, 2.5, 4.2, 0.3, VEGETABLES),
    ("Pumpkin", 22.0, 1.0, 4.4, 0.1, VEGETABLES),
    ("Apple", 47.0, 0.4, 9.8, 0.4, FRUITS),
    ("Banana", 96.0, 1.5, 21.0, 0.2, FRUITS),
    ("Orange", 36.0, 0.9, 8.1, 0.2, FRUITS),
    ("Pear", 42.0, 0.4, 10.3, 0.3, FRUITS),
    ("Grapes", 65.0, 0.6, 15.4, 0.2, FRUITS),
    ("Strawberry", 41.0, 0.8, 7.5, 0.4, FRUITS),
    ("Kiwi", 47.0, 0.8, 8.1, 0.4, FRUITS),
    ("Avocado", 208.0, 2.0, 7.4, 19.5, FRUITS),
    ("Lemon", 16.0, 0.9, 3.0, 0.1, FRUITS),
    ("Peach", 46.0, 0.9, 9.5, 0.1, FRUITS),
    ("Walnut", 656.0, 13.8, 11.1, 61.3, NUTS),
    ("Almond", 645.0, 18.6, 16.2, 57.7, NUTS),
    ("Peanut", 551.0, 26.3, 9.9, 45.2, NUTS),
    ("Sunflower Seeds", 601.0, 20.7, 10.5, 52.9, NUTS),
    ("Cashew", 600.0, 18.5, 22.5, 48.5, NUTS),
    ("Boiled Beans", 123.0, 7.8, 21.5, 0.5, LEGUMES),
    ("Boiled Peas", 60.0, 6.0, 9.0, 0.2, LEGUMES),
    ("Boiled Lentils", 111.0, 7.8, 17.5, 0.4, LEGUMES),
    ("Sunflower Oil", 899.0, 0.0, 0.0, 99.9, OILS),
    ("Olive Oil", 884.0, 0.0, 0.0, 99.8, OILS),
    ("Butter", 748.0, 0.5, 0.8, 82.5, OILS),
    ("Ghee", 892.0, 0.3, 0.6, 99.0, OILS),
    ("Borscht", 49.0, 1.6, 6.7, 1.8, READY_MEALS),
    ("Chicken Soup", 68.0, 3.7, 2.7, 4.8, READY_MEALS),
    ("Plov", 150.0, 4.2, 18.5, 6.7, READY_MEALS),
    ("Pelmeni", 248.0, 11.9, 23.0, 12.4, READY_MEALS),
    ("Fried Eggs (2 eggs)", 196.0, 14.0, 0.8, 14.6, READY_MEALS),
    ("Black Tea, Unsweetened", 1.0, 0.0, 0.3, 0.0, DRINKS),
    ("Green Tea, Unsweetened", 1.0, 0.0, 0.2, 0.0, DRINKS),
    ("Black Tea with Sugar (1 tsp)", 17.0, 0.0, 4.3, 0.0, DRINKS),
    ("Green Tea with Sugar (1 tsp)", 17.0, 0.0, 4.2, 0.0, DRINKS),
];

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
    /// Products in the catalog afterwards
    pub total: i64,
}

/// Insert every default product that is not in the catalog yet
pub fn seed_default_catalog(conn: &mut Connection) -> DbResult<SeedReport> {
    seed_products(conn, DEFAULT_CATALOG)
}

pub fn seed_products(conn: &mut Connection, products: &[SeedProduct]) -> DbResult<SeedReport> {
    let tx = conn.transaction()?;
    let mut added = 0;
    let mut skipped = 0;

    {
        let mut exists = tx.prepare("SELECT id FROM products WHERE name = ?1")?;
        let mut insert = tx.prepare(
            r#"
            INSERT INTO products (name, calories_per_100g, protein, carbs, fat, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;

        for &(name, calories, protein, carbs, fat, category) in products {
            let existing: Option<i64> = exists.query_row([name], |row| row.get(0)).optional()?;
            if existing.is_some() {
                debug!(product = name, "product already present");
                skipped += 1;
                continue;
            }
            insert.execute(params![name, calories, protein, carbs, fat, category])?;
            added += 1;
        }
    }

    let total: i64 = tx.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    tx.commit()?;

    info!(added, skipped, total, "catalog seeded");

    Ok(SeedReport { added, skipped, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::collections::HashSet;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<&str> = DEFAULT_CATALOG.iter().map(|p| p.0).collect();
        assert_eq!(names.len(), DEFAULT_CATALOG.len());
    }

    #[test]
    fn seeding_twice_adds_nothing_the_second_time() {
        let mut conn = setup();

        let first = seed_default_catalog(&mut conn).unwrap();
        assert_eq!(first.added, DEFAULT_CATALOG.len());
        assert_eq!(first.skipped, 0);
        assert_eq!(first.total, DEFAULT_CATALOG.len() as i64);

        let second = seed_default_catalog(&mut conn).unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.skipped, DEFAULT_CATALOG.len());
        assert_eq!(second.total, first.total);
    }

    #[test]
    fn existing_products_are_not_overwritten() {
        let mut conn = setup();
        conn.execute(
            "INSERT INTO products (name, calories_per_100g) VALUES ('Apple', 52)",
            [],
        )
        .unwrap();

        let report = seed_default_catalog(&mut conn).unwrap();
        assert_eq!(report.skipped, 1);

        let calories: f64 = conn
            .query_row("SELECT calories_per_100g FROM products WHERE name = 'Apple'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(calories, 52.0);
    }
}
