//! Shared fixtures for unit tests.

use super::{SeedData, SledStore};

/// Two meets:
/// - event 3: class 7 (competitors 42, 43), class 8 (competitor 50)
/// - event 4: class 9 (competitor 60)
pub const MEET_JSON: &str = r#"{
  "events": [
    {
      "id": 3, "name": "Spring Cup", "date": "2026-05-01", "location": "Falun",
      "classes": [
        { "id": 7, "name": "H21", "competitors": [
          { "id": 42, "firstName": "Ada", "lastName": "Berg", "club": "OK Linné", "status": "Active" },
          { "id": 43, "firstName": "Nils", "lastName": "Ek", "status": "Active" }
        ] },
        { "id": 8, "name": "D21", "competitors": [
          { "id": 50, "firstName": "Lina", "lastName": "Holm" }
        ] }
      ]
    },
    {
      "id": 4, "name": "Night Sprint", "date": "2026-05-02",
      "classes": [
        { "id": 9, "name": "Open", "competitors": [
          { "id": 60, "firstName": "Per", "lastName": "Lund" }
        ] }
      ]
    }
  ]
}"#;

pub fn seeded_store() -> SledStore {
    let store = SledStore::temporary().expect("temporary store");
    SeedData::from_json(MEET_JSON)
        .expect("fixture parses")
        .import(&store)
        .expect("fixture imports");
    store
}
