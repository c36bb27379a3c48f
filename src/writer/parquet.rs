use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, ListBuilder, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use serde_json::Value;

use crate::error::{CleanError, Result};
use crate::model::Table;

/// Serialize a table to `<filename>.parquet.gzip` with gzip compression.
///
/// The Arrow schema is inferred per column from the cells present; every
/// column is nullable.
pub fn write_parquet(table: &Table, filename: &str) -> Result<PathBuf> {
    if table.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    if filename.is_empty() {
        return Err(CleanError::EmptyArgument("filename"));
    }

    let batch = to_record_batch(table)?;
    let path = PathBuf::from(format!("{filename}.parquet.gzip"));
    let file = File::create(&path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::GZIP(GzipLevel::default()))
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    log::debug!("wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(path)
}

/// Cell-level type classification used for schema inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
}

impl ScalarKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() => Self::Int,
            Value::Number(_) => Self::Float,
            // Strings, and anything nested, render as text.
            _ => Self::Text,
        }
    }

    /// Promotion lattice: null yields to anything, int and float promote
    /// to float, any other mix promotes to text.
    fn merge(self, other: Self) -> Self {
        use ScalarKind::*;
        match (self, other) {
            (Null, kind) | (kind, Null) => kind,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Text,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            Self::Bool => DataType::Boolean,
            Self::Int => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Null | Self::Text => DataType::Utf8,
        }
    }
}

enum ColumnKind {
    Scalar(ScalarKind),
    List(ScalarKind),
}

impl ColumnKind {
    fn data_type(&self) -> DataType {
        match self {
            ColumnKind::Scalar(kind) => kind.data_type(),
            ColumnKind::List(inner) => {
                DataType::List(Arc::new(Field::new("item", inner.data_type(), true)))
            }
        }
    }
}

fn infer_column(table: &Table, column: usize) -> ColumnKind {
    let mut scalar = ScalarKind::Null;
    let mut inner = ScalarKind::Null;
    let mut has_list = false;
    let mut has_scalar = false;

    for row in table.rows() {
        match &row[column] {
            Value::Null => {}
            Value::Array(entries) => {
                has_list = true;
                for entry in entries {
                    inner = inner.merge(ScalarKind::of(entry));
                }
            }
            other => {
                has_scalar = true;
                scalar = scalar.merge(ScalarKind::of(other));
            }
        }
    }

    if has_list && !has_scalar {
        ColumnKind::List(inner)
    } else if has_list {
        // Lists mixed with scalars: fall back to the JSON text of every cell.
        ColumnKind::Scalar(ScalarKind::Text)
    } else {
        ColumnKind::Scalar(scalar)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.width());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.width());

    for (index, name) in table.columns().iter().enumerate() {
        let kind = infer_column(table, index);
        fields.push(Field::new(name.as_str(), kind.data_type(), true));
        arrays.push(build_array(table, index, &kind));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn build_array(table: &Table, column: usize, kind: &ColumnKind) -> ArrayRef {
    macro_rules! build_scalar {
        ($builder:expr, $get:expr) => {{
            let mut builder = $builder;
            for row in table.rows() {
                match $get(&row[column]) {
                    Some(v) => builder.append_value(v),
                    None => builder.append_null(),
                }
            }
            Arc::new(builder.finish()) as ArrayRef
        }};
    }

    match kind {
        ColumnKind::Scalar(ScalarKind::Bool) => {
            build_scalar!(BooleanBuilder::new(), |v: &Value| v.as_bool())
        }
        ColumnKind::Scalar(ScalarKind::Int) => {
            build_scalar!(Int64Builder::new(), |v: &Value| v.as_i64())
        }
        ColumnKind::Scalar(ScalarKind::Float) => {
            build_scalar!(Float64Builder::new(), |v: &Value| v.as_f64())
        }
        ColumnKind::Scalar(_) => build_scalar!(
            StringBuilder::new(),
            |v: &Value| -> Option<String> {
                match v {
                    Value::Null => None,
                    other => Some(scalar_text(other)),
                }
            }
        ),
        ColumnKind::List(inner) => build_list_array(table, column, *inner),
    }
}

fn build_list_array(table: &Table, column: usize, inner: ScalarKind) -> ArrayRef {
    macro_rules! build_list {
        ($builder:expr, $get:expr) => {{
            let mut builder = $builder;
            for row in table.rows() {
                match &row[column] {
                    Value::Array(entries) => {
                        for entry in entries {
                            match $get(entry) {
                                Some(v) => builder.values().append_value(v),
                                None => builder.values().append_null(),
                            }
                        }
                        builder.append(true);
                    }
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish()) as ArrayRef
        }};
    }

    match inner {
        ScalarKind::Bool => {
            build_list!(ListBuilder::new(BooleanBuilder::new()), |v: &Value| v.as_bool())
        }
        ScalarKind::Int => {
            build_list!(ListBuilder::new(Int64Builder::new()), |v: &Value| v.as_i64())
        }
        ScalarKind::Float => {
            build_list!(ListBuilder::new(Float64Builder::new()), |v: &Value| v.as_f64())
        }
        ScalarKind::Null | ScalarKind::Text => build_list!(
            ListBuilder::new(StringBuilder::new()),
            |v: &Value| -> Option<String> {
                match v {
                    Value::Null => None,
                    other => Some(scalar_text(other)),
                }
            }
        ),
    }
}
