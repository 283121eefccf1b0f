use calc_core::calculations::{
    calculate, evaluate, plan_all, plan_item, CommercialParameters, EstimateInput, LineItem,
};
use calc_core::materials::{Roll, Shape};
use calc_core::CalcError;
use test_case::test_case;

const EPS: f64 = 1e-9;

fn mug_job(roll_length: f64, margin: f64, additional: f64) -> EstimateInput {
    EstimateInput::new(
        Roll::new("Paper", 100.0, roll_length, 500.0),
        vec![LineItem::new(Shape::new("Mug", 25.0, 10.0), 12)],
        CommercialParameters::new(margin, additional),
    )
}

#[test_case(100.0, 30.0, 7, 20.0 => (3, 3, 60.0); "thirty wide")]
#[test_case(100.0, 25.0, 12, 10.0 => (4, 3, 30.0); "exact four across")]
#[test_case(100.0, 100.0, 2, 5.0 => (1, 2, 10.0); "full width")]
#[test_case(100.0, 49.9, 5, 1.0 => (2, 3, 3.0); "just under half")]
#[test_case(100.0, 1.0, 1, 4.0 => (100, 1, 4.0); "single piece narrow")]
fn packing(roll_width: f64, width: f64, quantity: u32, height: f64) -> (u64, u64, f64) {
    let row = plan_item(&Shape::new("S", width, height), quantity, roll_width).unwrap();
    (row.shapes_across, row.rows_for_item, row.length_consumed)
}

#[test]
fn fit_invariant() {
    let roll_width = 100.0;
    for tenths in 1..=1500 {
        let width = f64::from(tenths) / 10.0;
        let result = plan_item(&Shape::new("S", width, 1.0), 3, roll_width);
        if width <= roll_width {
            assert!(result.unwrap().shapes_across >= 1, "width {width}");
        } else {
            assert!(
                matches!(result, Err(CalcError::ShapeExceedsRollWidth { .. })),
                "width {width}"
            );
        }
    }
}

#[test]
fn monotonic_in_quantity() {
    let shape = Shape::new("S", 30.0, 20.0);
    let mut previous = plan_item(&shape, 1, 100.0).unwrap();
    for quantity in 2..=200 {
        let row = plan_item(&shape, quantity, 100.0).unwrap();
        assert!(row.rows_for_item >= previous.rows_for_item);
        assert!(row.length_consumed >= previous.length_consumed);
        previous = row;
    }
}

#[test]
fn end_to_end_scenario() {
    let result = calculate(&mug_job(50.0, 30.0, 0.0)).unwrap();
    let row = &result.layout.per_item[0];
    assert_eq!(row.shapes_across, 4);
    assert_eq!(row.rows_for_item, 3);
    assert_eq!(row.length_consumed, 30.0);

    let cost = result.cost;
    assert!((cost.material_cost_per_unit_length - 10.0).abs() < EPS);
    assert!((cost.total_material_cost - 300.0).abs() < EPS);
    assert!((cost.total_cost - 300.0).abs() < EPS);
    assert!((cost.cost_per_piece - 25.0).abs() < EPS);
    assert!((cost.sell_price_per_piece - 32.5).abs() < EPS);
    assert!((cost.total_sell_price - 390.0).abs() < EPS);
    assert!((cost.total_profit - 90.0).abs() < EPS);
}

#[test]
fn insufficient_material_scenario() {
    let err = calculate(&mug_job(20.0, 30.0, 0.0)).unwrap_err();
    assert_eq!(
        err,
        CalcError::InsufficientMaterial {
            required: 30.0,
            available: 20.0,
            shortfall: 10.0,
        }
    );
    assert!(err.to_string().contains("short by 10"));
}

#[test]
fn sufficiency_boundary() {
    assert!(calculate(&mug_job(30.0, 30.0, 0.0)).is_ok());

    let roll = Roll::new("Paper", 100.0, 30.0, 500.0);
    let mut over = plan_all(&[LineItem::new(Shape::new("Mug", 25.0, 10.0), 12)], 100.0).unwrap();
    over.total_length_consumed = 30.0 + 1e-9;
    assert!(matches!(
        evaluate(&over, &roll, &CommercialParameters::default()),
        Err(CalcError::InsufficientMaterial { .. })
    ));
}

#[test_case(0.0, 0.0; "no margin no extra")]
#[test_case(30.0, 0.0; "thirty percent")]
#[test_case(12.5, 17.3; "fractional with extra")]
#[test_case(250.0, 99.99; "large markup")]
fn cost_identity(margin: f64, additional: f64) {
    let cost = calculate(&mug_job(50.0, margin, additional)).unwrap().cost;
    assert_eq!(cost.total_sell_price - cost.total_cost, cost.total_profit);
    assert!(cost.total_profit >= 0.0);
}

#[test_case(0.0; "no extra")]
#[test_case(0.1; "tenth")]
#[test_case(33.33; "thirds")]
fn zero_margin_idempotence(additional: f64) {
    let input = EstimateInput::new(
        Roll::new("Paper", 100.0, 10.0, 7.7),
        vec![
            LineItem::new(Shape::new("A", 33.0, 0.3), 7),
            LineItem::new(Shape::new("B", 12.0, 0.7), 11),
        ],
        CommercialParameters::new(0.0, additional),
    );
    let cost = calculate(&input).unwrap().cost;
    assert_eq!(cost.sell_price_per_piece, cost.cost_per_piece);
    assert_eq!(cost.total_profit, 0.0);
}

#[test_case(Roll::new("R", 100.0, 0.0, 500.0); "zero length")]
#[test_case(Roll::new("R", 100.0, f64::NAN, 500.0); "nan length")]
#[test_case(Roll::new("R", 100.0, 50.0, f64::INFINITY); "infinite price")]
#[test_case(Roll::new("R", 0.0, 50.0, 500.0); "zero width")]
fn no_finite_leak_from_roll(roll: Roll) {
    let mut input = mug_job(50.0, 30.0, 0.0);
    input.roll = roll;
    let err = calculate(&input).unwrap_err();
    assert!(matches!(err, CalcError::InvalidDimension { .. }));
}

#[test]
fn no_pieces_is_typed_error() {
    let mut input = mug_job(50.0, 30.0, 0.0);
    input.items.clear();
    assert_eq!(calculate(&input).unwrap_err(), CalcError::EmptyLineItems);

    input.items.push(LineItem::new(Shape::new("Mug", 25.0, 10.0), 0));
    assert!(matches!(
        calculate(&input).unwrap_err(),
        CalcError::InvalidDimension { .. }
    ));
}

#[test]
fn success_results_are_finite() {
    let result = calculate(&mug_job(50.0, 30.0, 12.0)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    // serde_json writes non-finite floats as null
    assert!(!json.to_string().contains("null"));
}

#[test]
fn error_json_has_kind() {
    let err = calculate(&mug_job(20.0, 30.0, 0.0)).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "InsufficientMaterial");
    assert_eq!(json["details"]["shortfall"], 10.0);
}
