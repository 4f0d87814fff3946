use super::*;

#[test]
fn save_load_delete_cycle() {
    let mut store = MemoryTemplateStore::new();
    let owner = OwnerId::new("guild-1");
    assert!(store.load(&owner).unwrap().is_none());
    assert!(store.is_empty());

    let doc = serde_json::json!({ "version": "2.0" });
    store.save(&owner, &doc).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.load(&owner).unwrap(), Some(doc));

    // Saving again replaces in place.
    let doc = serde_json::json!({ "version": "2.0", "singular": [] });
    store.save(&owner, &doc).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.load(&owner).unwrap(), Some(doc));

    store.delete(&owner).unwrap();
    assert!(store.load(&owner).unwrap().is_none());
    assert!(store.is_empty());
    // Deleting a missing document is not an error.
    store.delete(&owner).unwrap();
}

#[test]
fn owners_do_not_see_each_other() {
    let mut store = MemoryTemplateStore::new();
    store
        .save(&OwnerId::new("a"), &serde_json::json!({ "version": "2.0" }))
        .unwrap();
    assert!(store.load(&OwnerId::new("b")).unwrap().is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn require_template_maps_missing_to_not_found() {
    let mut store = MemoryTemplateStore::new();
    let owner = OwnerId::new("guild-2");
    let err = require_template(&store, &owner).unwrap_err();
    assert!(matches!(err, SlatecastError::NotFound(_)));
    assert!(err.to_string().contains("guild-2"));

    store
        .save(&owner, &serde_json::json!({ "version": "2.0" }))
        .unwrap();
    assert!(require_template(&store, &owner).is_ok());
}
