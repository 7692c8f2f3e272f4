use agro_macros::value_object;

#[value_object]
struct Weight {
    grams: i64,
}

#[value_object(eq = false)]
struct Meter(f64);

#[value_object(debug = false)]
struct Hidden(i32);

#[value_object]
enum Grade {
    #[default]
    Standard,
    Premium,
}

fn main() {
    let _ = format!("{:?}", Weight { grams: 0 });

    let w = Weight::default();
    let _copy = w.clone();
    let _eq = w == Weight { grams: 0 };

    let _meter_eq = Meter(1.5) == Meter(1.5);

    let _ = Hidden(1);

    let g: Grade = Default::default();
    assert!(g == Grade::Standard);
    let _ = Grade::Premium;
}
