use c_destructor::core::header::parse_typedef_structs;
use c_destructor::domain::mapping::FieldMapping;
use c_destructor::domain::records::complex_full_header;
use c_destructor::{CRecord, Destructor, ParameterGroup, Unit};

fn units() -> Vec<Unit> {
    vec![
        Unit::new(
            1,
            42.0,
            ParameterGroup::new(10, 5, 2.0, [1.5, 3.0]),
            ParameterGroup::new(0, 0, 0.0, [0.0, 0.0]),
            [
                ParameterGroup::new(-1, 1, 0.125, [1e-3, 2.5e7]),
                ParameterGroup::new(i32::MAX, i32::MIN, -7.25, [0.1, 0.2]),
            ],
        ),
        Unit::default(),
    ]
}

/// 以完整結構本身作為 view 時，輸出與輸入完全相同
#[test]
fn test_identity_view_reproduces_initializer() {
    let header = complex_full_header();
    let structs = parse_typedef_structs("complex_full.h", &header).unwrap();
    let destructor =
        Destructor::new(&structs, &structs, Unit::C_NAME, Unit::C_NAME, &FieldMapping::new())
            .unwrap();

    for unit in units() {
        let init = unit.to_init_value().to_string();
        assert_eq!(destructor.process_structure(&init, Some(false)).unwrap(), init);
    }
}

/// 只取出 ParameterGroup 的 capacity 欄位
#[test]
fn test_parameter_group_projection() {
    let full = parse_typedef_structs("complex_full.h", &complex_full_header()).unwrap();
    let view = parse_typedef_structs(
        "cap_view.h",
        "typedef struct { float capacity[2]; } capOnly;",
    )
    .unwrap();
    let destructor = Destructor::new(
        &full,
        &view,
        ParameterGroup::C_NAME,
        "capOnly",
        &FieldMapping::new(),
    )
    .unwrap();

    let group = ParameterGroup::new(10, 5, 2.0, [1.5, 3.0]);
    let out = destructor
        .process_structure(&group.to_init_value().to_string(), None)
        .unwrap();
    assert_eq!(out, "{{1.5, 3.0}}");
    assert_eq!(destructor.expected_len(), 5);
}
