use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddAllergyRequest {
    pub allergen: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRestrictionRequest {
    pub restriction: String,
}

#[derive(Debug, Deserialize)]
pub struct AddPreferenceRequest {
    pub name: String,
    pub preference: String,
}
