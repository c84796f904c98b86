use std::sync::Arc;

use crate::bridge::ArrowSource;
use crate::config::IngestConfig;
use crate::error::TambakError;
use crate::fill_pipeline::{FillPath, FillReport, Loader};
use crate::null_handling::{NullPolicy, RowStatus};
use crate::table::{Schema, Table};
use crate::traits::FixedWidth;
use crate::types::{DateParts, Scalar, TambakDataType};

// We also need to bring in any external test dependencies.
use arrow::array::{
    ArrayRef, Date32Array, DictionaryArray, Float32Array, Float64Array, Int32Array, Int64Array,
    Int8Array, ListArray, NullArray, PrimitiveArray, StringArray, TimestampSecondArray,
};
use arrow::datatypes::{Int32Type, Int8Type};
use arrow::record_batch::RecordBatch;

// Test Helpers
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loader_with(columns: Vec<(&str, ArrayRef)>, config: IngestConfig) -> Loader<ArrowSource> {
    init_logging();
    let batch = RecordBatch::try_from_iter(columns).expect("test batch is well-formed");
    let source = ArrowSource::new(batch).expect("source decodes");
    Loader::with_config(source, Arc::new(config)).expect("source resolves")
}

fn loader(columns: Vec<(&str, ArrayRef)>) -> Loader<ArrowSource> {
    loader_with(columns, IngestConfig::default())
}

/// Creates a table from `schema` and fills every schema column with keys synthesized.
fn fill_new(loader: &Loader<ArrowSource>, schema: &Schema) -> (Table, FillReport) {
    let mut table = Table::new(schema).unwrap();
    let report = loader
        .fill_table(&mut table, schema, "", 0, 0, NullPolicy::Insert)
        .unwrap();
    (table, report)
}

//==============================================================================
// 1. Bulk / Iterative Equivalence
//==============================================================================

/// Fills the same homogeneous, null-free column once through each path and
/// asserts the two buffers are bit-identical.
fn assert_paths_equivalent<T: FixedWidth>(values: Vec<T>) {
    let array: ArrayRef = Arc::new(PrimitiveArray::<T::ArrowType>::from_iter_values(values));
    let schema = Schema::new([("v", T::DTYPE)]);

    let bulk_loader = loader(vec![("v", array.clone())]);
    let (bulk_table, bulk_report) = fill_new(&bulk_loader, &schema);

    let iterative_loader = loader_with(
        vec![("v", array)],
        IngestConfig {
            enable_bulk_copy: false,
            ..IngestConfig::default()
        },
    );
    let (iter_table, iter_report) = fill_new(&iterative_loader, &schema);

    assert_eq!(bulk_report.column("v").unwrap().path, FillPath::Bulk);
    assert_eq!(iter_report.column("v").unwrap().path, FillPath::Iterative);

    let bulk_col = bulk_table.column("v").unwrap();
    let iter_col = iter_table.column("v").unwrap();
    assert_eq!(bulk_col.as_bytes(), iter_col.as_bytes(), "dtype {}", T::DTYPE);
    assert_eq!(bulk_col.validity(), iter_col.validity());
}

#[test]
fn test_bulk_and_iterative_are_bit_identical() {
    assert_paths_equivalent::<i8>(vec![i8::MIN, -1, 0, 1, i8::MAX]);
    assert_paths_equivalent::<i16>(vec![i16::MIN, 300, i16::MAX]);
    assert_paths_equivalent::<i32>(vec![i32::MIN, 0, i32::MAX]);
    assert_paths_equivalent::<i64>(vec![i64::MIN, 42, i64::MAX]);
    assert_paths_equivalent::<u8>(vec![0, 128, u8::MAX]);
    assert_paths_equivalent::<u16>(vec![0, u16::MAX]);
    assert_paths_equivalent::<u32>(vec![0, u32::MAX]);
    assert_paths_equivalent::<u64>(vec![0, u64::MAX]);
    assert_paths_equivalent::<f32>(vec![-0.0, 1.5, f32::MAX, f32::INFINITY]);
    assert_paths_equivalent::<f64>(vec![-0.0, 0.1, f64::MIN_POSITIVE, f64::NEG_INFINITY]);
}

#[test]
fn test_bulk_path_on_empty_source() {
    let l = loader(vec![("v", Arc::new(Int32Array::from(Vec::<i32>::new())) as ArrayRef)]);
    let (table, report) = fill_new(&l, &Schema::new([("v", TambakDataType::Int32)]));
    assert_eq!(table.size(), 0);
    assert_eq!(report.column("v").unwrap().path, FillPath::Bulk);
}

//==============================================================================
// 2. Round Trip & Null Handling
//==============================================================================

#[test]
fn test_roundtrip_with_nulls_on_both_paths() {
    let l = loader(vec![
        ("a", Arc::new(Int32Array::from(vec![Some(1), None, Some(3)])) as ArrayRef),
        (
            "b",
            Arc::new(Float64Array::from(vec![Some(f64::NAN), Some(2.5), None])) as ArrayRef,
        ),
        ("c", Arc::new(StringArray::from(vec![None, Some("x"), Some("")])) as ArrayRef),
    ]);
    let schema = Schema::new([
        ("a", TambakDataType::Int32),
        ("b", TambakDataType::Float32),
        ("c", TambakDataType::String),
    ]);

    let (table, report) = fill_new(&l, &schema);

    assert_eq!(report.column("a").unwrap().path, FillPath::Bulk);
    assert_eq!(report.column("b").unwrap().path, FillPath::Iterative);

    let a = table.column("a").unwrap();
    assert_eq!(a.get(0), Some(Scalar::Int32(1)));
    assert_eq!(a.get(1), None);
    assert_eq!(a.get(2), Some(Scalar::Int32(3)));

    let b = table.column("b").unwrap();
    assert_eq!(b.get(0), None);
    assert_eq!(b.get(1), Some(Scalar::Float32(2.5)));
    assert_eq!(b.get(2), None);

    let c = table.column("c").unwrap();
    assert_eq!(c.get(0), None);
    assert_eq!(c.get(2), Some(Scalar::String(String::new())));
    assert_eq!(report.column("c").unwrap().null_count, 1);
}

#[test]
fn test_insert_nulls_are_idempotent() {
    let array: ArrayRef = Arc::new(Int64Array::from(vec![None, Some(2), None]));
    let l = loader(vec![("v", array)]);
    let schema = Schema::new([("v", TambakDataType::Int64)]);

    let (mut table, _) = fill_new(&l, &schema);
    let first = table.column("v").unwrap().clone();
    l.fill_table(&mut table, &schema, "", 0, 0, NullPolicy::Insert).unwrap();

    assert_eq!(table.column("v").unwrap(), &first);
    assert_eq!(first.status(0), RowStatus::Invalid);
}

#[test]
fn test_update_policy_retracts_on_both_paths() {
    let l = loader(vec![
        ("a", Arc::new(Int64Array::from(vec![None, Some(1)])) as ArrayRef),
        ("s", Arc::new(StringArray::from(vec![Some("k"), None])) as ArrayRef),
    ]);
    let schema = Schema::new([("a", TambakDataType::Int64), ("s", TambakDataType::String)]);
    let mut table = Table::new(&schema).unwrap();

    l.fill_table(&mut table, &schema, "", 0, 0, NullPolicy::Update).unwrap();

    assert_eq!(table.column("a").unwrap().status(0), RowStatus::Retracted);
    assert_eq!(table.column("a").unwrap().status(1), RowStatus::Valid);
    assert_eq!(table.column("s").unwrap().status(1), RowStatus::Retracted);
}

#[test]
fn test_null_layouts_without_a_null_buffer_read_back_null() {
    let keys = Int8Array::from(vec![0, 1]);
    let values = Arc::new(StringArray::from(vec![Some("x"), None]));
    let dict = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();
    let l = loader(vec![
        ("n", Arc::new(NullArray::new(2)) as ArrayRef),
        ("d", Arc::new(dict) as ArrayRef),
    ]);
    assert_eq!(l.types(), &[TambakDataType::String, TambakDataType::String]);
    let schema = Schema::new([("n", TambakDataType::String), ("d", TambakDataType::String)]);

    let (table, report) = fill_new(&l, &schema);

    let n = table.column("n").unwrap();
    assert_eq!(n.get(0), None);
    assert_eq!(n.get(1), None);
    assert_eq!(report.column("n").unwrap().null_count, 2);

    let d = table.column("d").unwrap();
    assert_eq!(d.get(0), Some(Scalar::String("x".to_string())));
    assert_eq!(d.get(1), None);
    assert_eq!(report.column("d").unwrap().null_count, 1);
}

#[test]
fn test_dictionary_encoded_numbers_fill_without_promotion() {
    let keys = Int8Array::from(vec![Some(1), None, Some(0), Some(1)]);
    let values = Arc::new(Int64Array::from(vec![7, 9]));
    let dict = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();
    let array: ArrayRef = Arc::new(dict);
    let schema = Schema::new([("v", TambakDataType::Int64)]);

    for enable_bulk_copy in [true, false] {
        let l = loader_with(
            vec![("v", array.clone())],
            IngestConfig {
                enable_bulk_copy,
                ..IngestConfig::default()
            },
        );
        assert_eq!(l.types(), &[TambakDataType::Int64]);

        let (table, report) = fill_new(&l, &schema);

        assert!(report.promotions.is_empty());
        let v = table.column("v").unwrap();
        assert_eq!(v.dtype(), TambakDataType::Int64);
        assert_eq!(v.get(0), Some(Scalar::Int64(9)));
        assert_eq!(v.get(1), None);
        assert_eq!(v.get(2), Some(Scalar::Int64(7)));
        assert_eq!(v.get(3), Some(Scalar::Int64(9)));
    }
}

//==============================================================================
// 3. Promotion
//==============================================================================

#[test]
fn test_int32_overflow_promotes_to_float64() {
    let l = loader(vec![(
        "a",
        Arc::new(Int64Array::from(vec![10, 2_147_483_648, 20])) as ArrayRef,
    )]);
    let (table, report) = fill_new(&l, &Schema::new([("a", TambakDataType::Int32)]));

    let a = table.column("a").unwrap();
    assert_eq!(a.dtype(), TambakDataType::Float64);
    assert_eq!(a.as_slice::<f64>(), Some(&[10.0, 2_147_483_648.0, 20.0][..]));
    assert_eq!(report.promotions.len(), 1);
    let promotion = &report.promotions[0];
    assert_eq!(promotion.column, "a");
    assert_eq!(promotion.from, TambakDataType::Int32);
    assert_eq!(promotion.to, TambakDataType::Float64);
    assert_eq!(promotion.row, 1);
    assert_eq!(report.column("a").unwrap().dtype, TambakDataType::Float64);
}

#[test]
fn test_promotion_preserves_prefix_nulls() {
    let l = loader(vec![(
        "a",
        Arc::new(Float64Array::from(vec![Some(1.0), None, Some(0.5)])) as ArrayRef,
    )]);
    let (table, report) = fill_new(&l, &Schema::new([("a", TambakDataType::Int32)]));

    let a = table.column("a").unwrap();
    assert_eq!(a.dtype(), TambakDataType::Float64);
    assert_eq!(a.get(0), Some(Scalar::Float64(1.0)));
    assert_eq!(a.get(1), None);
    assert_eq!(a.get(2), Some(Scalar::Float64(0.5)));
    assert_eq!(report.promotions[0].row, 2);
}

#[test]
fn test_non_numeric_text_promotes_int64_to_string() {
    let l = loader(vec![(
        "a",
        Arc::new(StringArray::from(vec!["1", "2", "abc", "4"])) as ArrayRef,
    )]);
    let (table, report) = fill_new(&l, &Schema::new([("a", TambakDataType::Int64)]));

    let a = table.column("a").unwrap();
    assert_eq!(a.dtype(), TambakDataType::String);
    let values: Vec<_> = (0..4).map(|row| a.get(row)).collect();
    assert_eq!(
        values,
        vec![
            Some(Scalar::String("1".to_string())),
            Some(Scalar::String("2".to_string())),
            Some(Scalar::String("abc".to_string())),
            Some(Scalar::String("4".to_string())),
        ]
    );
    assert_eq!(report.promotions.len(), 1);
    assert_eq!(report.promotions[0].to, TambakDataType::String);
}

#[test]
fn test_int32_chain_to_float_then_string() {
    let l = loader(vec![(
        "a",
        Arc::new(StringArray::from(vec!["1", "1.5", "n/a"])) as ArrayRef,
    )]);
    let (table, report) = fill_new(&l, &Schema::new([("a", TambakDataType::Int32)]));

    // Int32 has no string path: "1.5" widens to float64, then "n/a" forces string.
    let a = table.column("a").unwrap();
    assert_eq!(a.dtype(), TambakDataType::String);
    assert_eq!(a.get(1), Some(Scalar::String("1.5".to_string())));
    assert_eq!(a.get(2), Some(Scalar::String("n/a".to_string())));
    assert_eq!(report.promotions_for("a").count(), 2);
}

#[test]
fn test_unpromotable_narrowing_stores_null() {
    let l = loader(vec![(
        "a",
        Arc::new(Int64Array::from(vec![1, 70_000])) as ArrayRef,
    )]);
    let (table, report) = fill_new(&l, &Schema::new([("a", TambakDataType::Int16)]));

    let a = table.column("a").unwrap();
    assert_eq!(a.dtype(), TambakDataType::Int16);
    assert_eq!(a.get(0), Some(Scalar::Int16(1)));
    assert_eq!(a.get(1), None);
    assert!(report.promotions.is_empty());
}

//==============================================================================
// 4. Temporal Columns
//==============================================================================

#[test]
fn test_time_rescale_by_factor() {
    let l = loader(vec![
        ("raw", Arc::new(Int64Array::from(vec![Some(1), None, Some(-2)])) as ArrayRef),
        ("ts", Arc::new(TimestampSecondArray::from(vec![3, 4, 5])) as ArrayRef),
    ]);
    let schema = Schema::new([("raw", TambakDataType::Time), ("ts", TambakDataType::Time)]);
    let (table, _) = fill_new(&l, &schema);

    let raw = table.column("raw").unwrap();
    assert_eq!(raw.get(0), Some(Scalar::Time(1_000)));
    assert_eq!(raw.get(1), None);
    assert_eq!(raw.get(2), Some(Scalar::Time(-2_000)));
    assert_eq!(table.column("ts").unwrap().get(2), Some(Scalar::Time(5_000)));
}

#[test]
fn test_time_scale_factor_is_configurable() {
    let l = loader_with(
        vec![("raw", Arc::new(Int64Array::from(vec![7])) as ArrayRef)],
        IngestConfig {
            time_scale_factor: 1,
            ..IngestConfig::default()
        },
    );
    let (table, _) = fill_new(&l, &Schema::new([("raw", TambakDataType::Time)]));
    assert_eq!(table.column("raw").unwrap().get(0), Some(Scalar::Time(7)));
}

#[test]
fn test_dates_from_native_and_text() {
    let l = loader(vec![
        ("d", Arc::new(Date32Array::from(vec![Some(0), None])) as ArrayRef),
        (
            "t",
            Arc::new(StringArray::from(vec!["2024-02-29", "2023-02-29"])) as ArrayRef,
        ),
    ]);
    let schema = Schema::new([("d", TambakDataType::Date), ("t", TambakDataType::Date)]);
    let (table, _) = fill_new(&l, &schema);

    let d = table.column("d").unwrap();
    assert_eq!(d.get(0), Some(Scalar::Date(DateParts::new(1970, 1, 1))));
    assert_eq!(d.get(1), None);

    // An impossible calendar date is stored as null.
    let t = table.column("t").unwrap();
    assert_eq!(t.get(0), Some(Scalar::Date(DateParts::new(2024, 2, 29))));
    assert_eq!(t.get(1), None);
}

#[test]
fn test_boolean_from_mixed_sources() {
    let l = loader(vec![
        ("n", Arc::new(Int32Array::from(vec![0, 5])) as ArrayRef),
        ("s", Arc::new(StringArray::from(vec!["false", "maybe"])) as ArrayRef),
    ]);
    let schema = Schema::new([("n", TambakDataType::Boolean), ("s", TambakDataType::Boolean)]);
    let (table, _) = fill_new(&l, &schema);

    assert_eq!(table.column("n").unwrap().get(1), Some(Scalar::Boolean(true)));
    assert_eq!(table.column("s").unwrap().get(0), Some(Scalar::Boolean(false)));
    assert_eq!(table.column("s").unwrap().get(1), None);
}

//==============================================================================
// 5. Key Columns
//==============================================================================

#[test]
fn test_index_synthesis_with_offset_and_limit() {
    let l = loader(vec![("v", Arc::new(Int32Array::from(vec![1, 2, 3, 4, 5])) as ArrayRef)]);
    let schema = Schema::new([("v", TambakDataType::Int32)]);
    let mut table = Table::new(&schema).unwrap();

    l.fill_table(&mut table, &schema, "", 5, 3, NullPolicy::Insert).unwrap();

    let config = IngestConfig::default();
    let pkey = table.column(&config.pkey_column).unwrap();
    let okey = table.column(&config.okey_column).unwrap();
    let expected: Vec<i64> = (0..5).map(|i| (i + 5) % 3).collect();
    assert_eq!(pkey.as_slice::<i64>().unwrap(), expected.as_slice());
    assert_eq!(okey.as_slice::<i64>().unwrap(), expected.as_slice());
}

#[test]
fn test_sentinel_identity_is_copied_into_both_keys() {
    let l = loader(vec![
        ("__INDEX__", Arc::new(Int64Array::from(vec![7, 8, 9])) as ArrayRef),
        ("a", Arc::new(Int32Array::from(vec![1, 2, 3])) as ArrayRef),
    ]);
    let table_schema = Schema::new([("a", TambakDataType::Int32)]);
    let input_schema = Schema::new([
        ("__INDEX__", TambakDataType::Int64),
        ("a", TambakDataType::Int32),
    ]);
    let mut table = Table::new(&table_schema).unwrap();

    // Offset and limit are ignored when the sentinel is present.
    l.fill_table(&mut table, &input_schema, "", 100, 2, NullPolicy::Insert)
        .unwrap();

    let config = IngestConfig::default();
    let pkey = table.column(&config.pkey_column).unwrap();
    let okey = table.column(&config.okey_column).unwrap();
    assert_eq!(pkey.as_slice::<i64>(), Some(&[7, 8, 9][..]));
    assert_eq!(pkey.data(), okey.data());
    assert_eq!(pkey.validity(), okey.validity());
    assert!(table.column("__INDEX__").is_none());
}

#[test]
fn test_explicit_index_column_is_cloned() {
    let l = loader(vec![(
        "id",
        Arc::new(StringArray::from(vec![Some("x"), None])) as ArrayRef,
    )]);
    let schema = Schema::new([("id", TambakDataType::String)]);
    let mut table = Table::new(&schema).unwrap();

    l.fill_table(&mut table, &schema, "id", 0, 0, NullPolicy::Insert).unwrap();

    let config = IngestConfig::default();
    let id = table.column("id").unwrap();
    let pkey = table.column(&config.pkey_column).unwrap();
    assert_eq!(pkey.data(), id.data());
    assert_eq!(pkey.get(1), None);
    assert_eq!(table.num_columns(), 3);
}

//==============================================================================
// 6. Fatal Errors
//==============================================================================

#[test]
fn test_column_missing_from_table_aborts() {
    let l = loader(vec![("a", Arc::new(Int32Array::from(vec![1])) as ArrayRef)]);
    let mut table = Table::new(&Schema::new([("b", TambakDataType::Int32)])).unwrap();
    let input = Schema::new([("a", TambakDataType::Int32)]);

    let err = l
        .fill_table(&mut table, &input, "", 0, 0, NullPolicy::Insert)
        .unwrap_err();
    assert!(matches!(err, TambakError::SchemaError { ref column, location: "table" } if column == "a"));
}

#[test]
fn test_column_missing_from_source_aborts_after_earlier_columns() {
    let l = loader(vec![("a", Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef)]);
    let schema = Schema::new([("a", TambakDataType::Int32), ("b", TambakDataType::Int32)]);
    let mut table = Table::new(&schema).unwrap();

    let err = l
        .fill_table(&mut table, &schema, "", 0, 0, NullPolicy::Insert)
        .unwrap_err();

    assert!(matches!(err, TambakError::SchemaError { ref column, location: "source" } if column == "b"));
    // No rollback: column `a` stays written.
    assert_eq!(table.column("a").unwrap().get(1), Some(Scalar::Int32(2)));
}

#[test]
fn test_nested_source_column_fails_resolution() {
    init_logging();
    let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![Some(vec![Some(1)])]);
    let batch = RecordBatch::try_from_iter(vec![
        ("ok", Arc::new(Float32Array::from(vec![1.0])) as ArrayRef),
        ("tags", Arc::new(list) as ArrayRef),
    ])
    .unwrap();

    let result = Loader::new(ArrowSource::new(batch).unwrap());
    assert!(matches!(
        result,
        Err(TambakError::UnsupportedContainerError { ref column, .. }) if column == "tags"
    ));
}

#[test]
fn test_loader_exposes_resolved_schema() {
    let l = loader(vec![
        ("n", Arc::new(Int64Array::from(vec![1])) as ArrayRef),
        ("d", Arc::new(Date32Array::from(vec![1])) as ArrayRef),
    ]);
    assert_eq!(l.names(), &["n".to_string(), "d".to_string()]);
    assert_eq!(l.types(), &[TambakDataType::Int64, TambakDataType::String]);
    assert_eq!(l.row_count(), 1);
}
