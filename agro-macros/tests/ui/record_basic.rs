use agro_domain::record::{Coded, OwnerId, Record, RecordId};
use agro_domain::value_object::{Audit, Code, Prefix};
use agro_macros::record;

#[record(kind = "tractor", prefix = "TRC", search = [code, model], unique = [chassis])]
#[serde(rename_all = "camelCase")]
struct Tractor {
    model: String,
    chassis: String,
}

#[record(search = [label])]
struct Note {
    label: String,
}

fn main() {
    let prefix = Prefix::new(Tractor::PREFIX).unwrap();
    let owner = OwnerId::new("u-1".to_string());
    let tractor = Tractor {
        id: RecordId::generate(),
        code: Code::new(prefix, 7).unwrap(),
        owner: owner.clone(),
        audit: Audit::created(&owner),
        model: "T-40".into(),
        chassis: "CH-9".into(),
    };

    assert_eq!(Tractor::KIND, "tractor");
    assert_eq!(tractor.code().to_string(), "TRC007");
    assert_eq!(tractor.search_fields(), vec!["TRC007".to_string(), "T-40".to_string()]);
    assert_eq!(
        tractor.unique_fields(),
        vec![("code", "TRC007".to_string()), ("chassis", "CH-9".to_string())]
    );

    let note = Note {
        id: RecordId::generate(),
        owner: owner.clone(),
        audit: Audit::created(&owner),
        label: "hello".into(),
    };
    assert_eq!(Note::KIND, "note");
    assert!(note.unique_fields().is_empty());
    let _ = format!("{:?}", note.clone());
}
