use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::errors::CongruenceError;

/// Dense row-major matrix with named axes.
///
/// Assignment, dependency and change-activity data arrive keyed by miner-local
/// integer ids; builders resolve those to names once, and every downstream
/// join (matrix products, co-edit counting, scoring) happens on the label
/// vectors held here. Labels are unique per axis and their order is the
/// canonical ordering for the matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct LabeledMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    row_index: HashMap<String, usize>,
    col_index: HashMap<String, usize>,
    data: Vec<f64>,
}

/// Wire form of a matrix: axis labels plus row-major values.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct MatrixRepr {
    rows: Vec<String>,
    cols: Vec<String>,
    data: Vec<f64>,
}

fn index_labels(labels: &[String], axis: &str) -> Result<HashMap<String, usize>, CongruenceError> {
    let mut index = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), i).is_some() {
            return Err(CongruenceError::integrity(format!(
                "duplicate {axis} label {label:?}"
            )));
        }
    }
    Ok(index)
}

impl LabeledMatrix {
    /// Zero-filled matrix over the given axis labels.
    pub fn zeros(rows: Vec<String>, cols: Vec<String>) -> Result<Self, CongruenceError> {
        let row_index = index_labels(&rows, "row")?;
        let col_index = index_labels(&cols, "column")?;
        let data = vec![0.0; rows.len() * cols.len()];
        Ok(Self {
            rows,
            cols,
            row_index,
            col_index,
            data,
        })
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    /// Value by label, `None` when either label is unknown.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = *self.row_index.get(row)?;
        let j = *self.col_index.get(col)?;
        Some(self.value_at(i, j))
    }

    /// Value by position. Panics on out-of-range indices.
    pub fn value_at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols.len() + j]
    }

    pub fn set_at(&mut self, i: usize, j: usize, value: f64) {
        let cols = self.cols.len();
        self.data[i * cols + j] = value;
    }

    pub fn add_at(&mut self, i: usize, j: usize, value: f64) {
        let cols = self.cols.len();
        self.data[i * cols + j] += value;
    }

    pub fn has_row(&self, label: &str) -> bool {
        self.row_index.contains_key(label)
    }

    pub fn has_col(&self, label: &str) -> bool {
        self.col_index.contains_key(label)
    }

    /// Label-aligned matrix product.
    ///
    /// The right operand's rows are matched to this matrix's columns by name,
    /// so the two operands may order their shared axis differently. A label
    /// missing on either side means the artifacts were mined over different
    /// id spaces and the product is refused.
    pub fn dot(&self, other: &LabeledMatrix) -> Result<LabeledMatrix, CongruenceError> {
        if self.cols.len() != other.rows.len() {
            return Err(CongruenceError::integrity(format!(
                "axis mismatch: {} columns on the left, {} rows on the right",
                self.cols.len(),
                other.rows.len()
            )));
        }
        let mut alignment = Vec::with_capacity(self.cols.len());
        for label in &self.cols {
            let k = other.row_index.get(label).ok_or_else(|| {
                CongruenceError::integrity(format!(
                    "axis mismatch: label {label:?} has no row in the right operand"
                ))
            })?;
            alignment.push(*k);
        }

        let mut result = LabeledMatrix::zeros(self.rows.clone(), other.cols.clone())?;
        let inner = self.cols.len();
        let out_cols = other.cols.len();
        for i in 0..self.rows.len() {
            for (k, &other_row) in alignment.iter().enumerate() {
                let lhs = self.data[i * inner + k];
                if lhs == 0.0 {
                    continue;
                }
                for j in 0..out_cols {
                    result.data[i * out_cols + j] += lhs * other.data[other_row * out_cols + j];
                }
            }
        }
        Ok(result)
    }

    pub fn transpose(&self) -> LabeledMatrix {
        let mut data = vec![0.0; self.data.len()];
        let rows = self.rows.len();
        let cols = self.cols.len();
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        LabeledMatrix {
            rows: self.cols.clone(),
            cols: self.rows.clone(),
            row_index: self.col_index.clone(),
            col_index: self.row_index.clone(),
            data,
        }
    }

    /// Re-label onto new axes, zero-filling positions this matrix has no
    /// entry for. Used to put matrices from different miners onto one shared
    /// developer ordering.
    pub fn reindex(&self, rows: &[String], cols: &[String]) -> Result<LabeledMatrix, CongruenceError> {
        let mut result = LabeledMatrix::zeros(rows.to_vec(), cols.to_vec())?;
        for (i, row) in rows.iter().enumerate() {
            let Some(&src_i) = self.row_index.get(row) else {
                continue;
            };
            for (j, col) in cols.iter().enumerate() {
                if let Some(&src_j) = self.col_index.get(col) {
                    result.set_at(i, j, self.value_at(src_i, src_j));
                }
            }
        }
        Ok(result)
    }

    /// Export as a row-keyed nested table, the shape stored and served by the
    /// surrounding system.
    pub fn to_nested_map(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells = self
                    .cols
                    .iter()
                    .enumerate()
                    .map(|(j, col)| (col.clone(), self.value_at(i, j)))
                    .collect();
                (row.clone(), cells)
            })
            .collect()
    }

    /// Import from a row-keyed nested table. Axis order is lexical since the
    /// nested form carries no ordering of its own; ragged rows are rejected.
    pub fn from_nested_map(
        map: &BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Result<LabeledMatrix, CongruenceError> {
        let rows: Vec<String> = map.keys().cloned().collect();
        let mut cols: Vec<String> = Vec::new();
        if let Some(first) = map.values().next() {
            cols = first.keys().cloned().collect();
        }
        let mut matrix = LabeledMatrix::zeros(rows, cols)?;
        for (i, cells) in map.values().enumerate() {
            if cells.len() != matrix.cols.len() {
                return Err(CongruenceError::integrity(format!(
                    "ragged matrix table: row {:?} has {} cells, expected {}",
                    matrix.rows[i],
                    cells.len(),
                    matrix.cols.len()
                )));
            }
            for (col, &value) in cells {
                let Some(&j) = matrix.col_index.get(col) else {
                    return Err(CongruenceError::integrity(format!(
                        "ragged matrix table: row {:?} has unexpected column {col:?}",
                        matrix.rows[i]
                    )));
                };
                matrix.set_at(i, j, value);
            }
        }
        Ok(matrix)
    }
}

impl TryFrom<MatrixRepr> for LabeledMatrix {
    type Error = CongruenceError;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        if repr.data.len() != repr.rows.len() * repr.cols.len() {
            return Err(CongruenceError::integrity(format!(
                "matrix payload has {} values for a {}x{} shape",
                repr.data.len(),
                repr.rows.len(),
                repr.cols.len()
            )));
        }
        let row_index = index_labels(&repr.rows, "row")?;
        let col_index = index_labels(&repr.cols, "column")?;
        Ok(Self {
            rows: repr.rows,
            cols: repr.cols,
            row_index,
            col_index,
            data: repr.data,
        })
    }
}

impl From<LabeledMatrix> for MatrixRepr {
    fn from(matrix: LabeledMatrix) -> Self {
        Self {
            rows: matrix.rows,
            cols: matrix.cols,
            data: matrix.data,
        }
    }
}
