use remodel_metrics::number;
use serde_json::Value;

/**
A two dimensional table reported by the cluster, such as a model summary or a scoring history. The wire format stores cells column by column. A `Table` stores them row by row.
*/
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(from = "RawTable")]
pub struct Table {
	pub name: Option<String>,
	pub description: Option<String>,
	pub columns: Vec<TableColumn>,
	pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TableColumn {
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(serde::Deserialize)]
struct RawTable {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	columns: Vec<TableColumn>,
	#[serde(default)]
	rowcount: Option<usize>,
	#[serde(default)]
	data: Vec<Vec<Value>>,
}

impl From<RawTable> for Table {
	fn from(raw: RawTable) -> Self {
		let n_rows = raw
			.rowcount
			.unwrap_or_else(|| raw.data.iter().map(|column| column.len()).max().unwrap_or(0));
		let rows = (0..n_rows)
			.map(|row_index| {
				(0..raw.columns.len())
					.map(|column_index| {
						raw.data
							.get(column_index)
							.and_then(|column| column.get(row_index))
							.cloned()
							.unwrap_or(Value::Null)
					})
					.collect()
			})
			.collect();
		Table {
			name: raw.name,
			description: raw.description,
			columns: raw.columns,
			rows,
		}
	}
}

impl Table {
	pub fn n_rows(&self) -> usize {
		self.rows.len()
	}

	pub fn header(&self) -> Vec<&str> {
		self.columns.iter().map(|column| column.name.as_str()).collect()
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|column| column.name == name)
	}

	/// The cells of the column named `name`, top to bottom.
	pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
		let index = self.column_index(name)?;
		Some(self.rows.iter().map(|row| &row[index]).collect())
	}

	/// The cells of the column named `name` read as numbers. Cells that are not numbers are `None`.
	pub fn column_f64(&self, name: &str) -> Option<Vec<Option<f64>>> {
		let column = self.column(name)?;
		Some(column.into_iter().map(number::from_value).collect())
	}

	pub fn column_str(&self, name: &str) -> Option<Vec<Option<&str>>> {
		let column = self.column(name)?;
		Some(column.into_iter().map(|value| value.as_str()).collect())
	}

	/// A copy of this table without its first `n` rows.
	pub fn skip_rows(&self, n: usize) -> Table {
		Table {
			name: self.name.clone(),
			description: self.description.clone(),
			columns: self.columns.clone(),
			rows: self.rows.iter().skip(n).cloned().collect(),
		}
	}
}

fn cell_to_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		value => value.to_string(),
	}
}

impl std::fmt::Display for Table {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let padding = 1;
		let header = self.header();
		let values: Vec<Vec<String>> = self
			.rows
			.iter()
			.map(|row| row.iter().map(cell_to_string).collect())
			.collect();
		let mut column_widths: Vec<usize> = header.iter().map(|name| name.len()).collect();
		for row in values.iter() {
			for (column_width, value) in column_widths.iter_mut().zip(row.iter()) {
				*column_width = usize::max(*column_width, value.len());
			}
		}
		if let Some(name) = &self.name {
			writeln!(f, "{}", name)?;
		}
		let line = Line {
			column_widths: &column_widths,
			padding,
		};
		let row = Row {
			column_widths: &column_widths,
			padding,
			values: &header,
		};
		writeln!(f, "{}", row)?;
		writeln!(f, "{}", line)?;
		for values in values.iter() {
			let values: Vec<&str> = values.iter().map(|value| value.as_str()).collect();
			let row = Row {
				column_widths: &column_widths,
				padding,
				values: &values,
			};
			writeln!(f, "{}", row)?;
		}
		Ok(())
	}
}

struct Line<'a> {
	column_widths: &'a [usize],
	padding: usize,
}

impl<'a> std::fmt::Display for Line<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for column_width in self.column_widths.iter() {
			for _ in 0..column_width + 2 * self.padding {
				write!(f, "-")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

struct Row<'a> {
	column_widths: &'a [usize],
	padding: usize,
	values: &'a [&'a str],
}

impl<'a> std::fmt::Display for Row<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for (column_width, value) in self.column_widths.iter().zip(self.values) {
			for _ in 0..self.padding {
				write!(f, " ")?;
			}
			write!(f, "{}", value)?;
			for _ in 0..column_width + self.padding - value.len() {
				write!(f, " ")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

#[cfg(test)]
fn scoring_history() -> Table {
	serde_json::from_value(serde_json::json!({
		"name": "Scoring History",
		"columns": [
			{ "name": "number_of_trees", "type": "long" },
			{ "name": "training_rmse", "type": "double" },
		],
		"rowcount": 3,
		"data": [
			[0, 1, 2],
			["NaN", 0.75, 0.5],
		],
	}))
	.unwrap()
}

#[test]
fn test_column_major_to_rows() {
	let table = scoring_history();
	assert_eq!(table.n_rows(), 3);
	assert_eq!(table.header(), vec!["number_of_trees", "training_rmse"]);
	assert_eq!(table.rows[1], vec![serde_json::json!(1), serde_json::json!(0.75)]);
	let rmse = table.column_f64("training_rmse").unwrap();
	assert!(rmse[0].unwrap().is_nan());
	assert_eq!(&rmse[1..], &[Some(0.75), Some(0.5)]);
	assert!(table.column("validation_rmse").is_none());
	assert_eq!(table.skip_rows(1).n_rows(), 2);
}

#[test]
fn test_short_columns_are_padded() {
	let table: Table = serde_json::from_value(serde_json::json!({
		"columns": [{ "name": "a" }, { "name": "b" }],
		"data": [[1, 2], [3]],
	}))
	.unwrap();
	assert_eq!(table.n_rows(), 2);
	assert_eq!(table.rows[1][1], Value::Null);
}

#[test]
fn test_display() {
	let table = scoring_history();
	insta::assert_snapshot!(table.to_string(), @r###"
 Scoring History
 | number_of_trees | training_rmse |
 |-----------------|---------------|
 | 0               | NaN           |
 | 1               | 0.75          |
 | 2               | 0.5           |
 "###);
}
