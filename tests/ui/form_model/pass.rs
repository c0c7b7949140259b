use contactkit::form::{FieldStore, FormModel, validate};

#[derive(Clone, contactkit::form::FormModel)]
struct Signup {
    #[field(
        required = "Handle is required",
        min_len = 3,
        min_len_message = "Handle is too short"
    )]
    handle: String,
    #[field(pattern = r"^\d+$", pattern_message = "Digits only")]
    referral: String,
    note: String,
}

fn main() {
    let keys = Signup::field_keys();
    assert_eq!(keys.len(), 3);
    assert_eq!(keys[0].as_str(), "handle");

    let rules = Signup::rules().expect("rules compile");
    assert_eq!(rules.len(), 2);

    let mut store = FieldStore::new(keys);
    store.set_value("handle", "ab").expect("handle");
    store.set_value("referral", "12x").expect("referral");
    store.set_value("note", "anything").expect("note");

    let errors = validate(store.values(), &rules);
    assert_eq!(errors.get("handle"), Some("Handle is too short"));
    assert_eq!(errors.get("referral"), Some("Digits only"));
    assert!(!errors.contains("note"));

    let signup = Signup::from_values(store.values());
    assert_eq!(signup.handle, "ab");
    assert_eq!(signup.note, "anything");
}
