use agro_macros::entity_id;
use uuid::Uuid;

#[entity_id]
struct LotId(Uuid);

#[entity_id(debug = false)]
struct TokenId(String);

impl std::fmt::Debug for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenId(..)")
    }
}

fn main() {
    let raw = Uuid::new_v4();
    let id = LotId::new(raw);
    let _ = format!("{:?}", id); // 默认启用 Debug
    assert_eq!(id.to_string(), raw.to_string());

    let parsed: LotId = raw.to_string().parse().unwrap();
    assert_eq!(parsed, id);
    assert_eq!(parsed.into_inner(), raw);

    let token = TokenId::from("secret".to_string());
    assert_eq!(format!("{:?}", token), "TokenId(..)");
    assert_eq!(token.as_ref(), "secret");
}
