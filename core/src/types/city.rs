/// A city row. The owning country is referenced by code only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub population: i32,
    pub district: String,
    pub country_code: String,
}
