//! Batch generation: one block per row, counters advancing per row, and
//! identical output from the parallel path.

mod common;

use common::{fixed_now, row, shipping_design, shipping_rows};
use labelgen_core::design::TextElement;
use labelgen_core::{
    Design, Element, ElementKind, GenerateOptions, Row, generate_batch, generate_batch_at,
    generate_batch_par,
};

fn counter_design() -> Design {
    Design::new(40.0, 20.0).with_element(
        Element::new(
            "serie",
            ElementKind::Text(TextElement {
                binding: Some("{{LOTE(AAMMDD-###)}} / {{CONTADOR(10, 5, 3)}}".into()),
                ..Default::default()
            }),
        )
        .at(2.0, 2.0)
        .sized(36.0, 5.0),
    )
}

fn field_values(zpl: &str) -> Vec<&str> {
    zpl.split("^FD")
        .skip(1)
        .filter_map(|rest| rest.split_once("^FS").map(|(data, _)| data))
        .collect()
}

#[test]
fn one_block_per_row() {
    let rows = shipping_rows();
    let options = GenerateOptions::default();
    let zpl = generate_batch_at(&shipping_design(), &rows, fixed_now(), &options);
    assert_eq!(zpl.matches("^XA").count(), rows.len());
    assert_eq!(zpl.matches("^XZ").count(), rows.len());
}

#[test]
fn empty_batch_is_empty_output() {
    assert_eq!(
        generate_batch(&shipping_design(), &[], &GenerateOptions::default()),
        ""
    );
}

#[test]
fn counters_advance_once_per_row() {
    let rows = vec![Row::new(); 4];
    let zpl = generate_batch_at(&counter_design(), &rows, fixed_now(), &GenerateOptions::default());
    assert_eq!(
        field_values(&zpl),
        vec![
            "260315-001 / 010",
            "260315-002 / 015",
            "260315-003 / 020",
            "260315-004 / 025",
        ]
    );
}

#[test]
fn counters_ignore_element_count() {
    let design = counter_design()
        .with_element(counter_design().elements[0].clone().at(2.0, 10.0));
    let rows = vec![Row::new(); 2];
    let zpl = generate_batch_at(&design, &rows, fixed_now(), &GenerateOptions::default());
    assert_eq!(
        field_values(&zpl),
        vec![
            "260315-001 / 010",
            "260315-001 / 010",
            "260315-002 / 015",
            "260315-002 / 015",
        ]
    );
}

#[test]
fn rows_render_in_order() {
    let rows = shipping_rows();
    let options = GenerateOptions::default();
    let zpl = generate_batch_at(&shipping_design(), &rows, fixed_now(), &options);
    let a = zpl.find("A-1001").unwrap();
    let b = zpl.find("A-1002").unwrap();
    let c = zpl.find("^FD1003^FS").unwrap();
    assert!(a < b && b < c);
    assert!(zpl.contains("Lote 2603-0003"));
}

#[test]
fn parallel_matches_sequential() {
    let rows: Vec<Row> = (0..200)
        .map(|i| {
            let cliente = format!("cliente {i}");
            let sku = format!("S{i:04}");
            row(&[("cliente", cliente.as_str()), ("sku", sku.as_str())])
        })
        .collect();
    let design = shipping_design();
    let options = GenerateOptions::default().copies(2);
    let sequential = generate_batch_at(&design, &rows, fixed_now(), &options);
    let parallel = generate_batch_par(&design, &rows, fixed_now(), &options);
    assert_eq!(sequential, parallel);
    assert!(parallel.contains("Lote 2603-0200"));
    assert_eq!(parallel.matches("^PQ2\n").count(), 200);
}
