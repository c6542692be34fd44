/// Rescale a recipe-level quantity to an actual portion.
///
/// Recipe quantities (ingredients and nutrient facts) are declared over the
/// recipe's full serving count, so the consumed or needed amount for
/// `portion` servings is `(quantity / servings) * portion`. A serving count
/// of zero or less means the recipe has no computable per-serving quantity
/// and contributes nothing.
pub fn scaled_quantity(quantity: f64, servings: f64, portion: f64) -> f64 {
    if servings > 0.0 {
        (quantity / servings) * portion
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_proportionally() {
        // 40g of sugar over 4 servings, 2 servings eaten -> 20g
        assert_eq!(scaled_quantity(40.0, 4.0, 2.0), 20.0);
    }

    #[test]
    fn zero_servings_contributes_nothing() {
        assert_eq!(scaled_quantity(40.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn negative_servings_contributes_nothing() {
        assert_eq!(scaled_quantity(40.0, -1.0, 2.0), 0.0);
    }

    #[test]
    fn fractional_portions() {
        assert_eq!(scaled_quantity(200.0, 2.0, 0.5), 50.0);
    }
}
