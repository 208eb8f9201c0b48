// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{BasketError, Result};
use crate::item::normalize_item_name;
use csv::{ReaderBuilder, WriterBuilder};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Snapshot of the stored carts. Every row has exactly one cell per column;
// carts shorter than the widest cart are padded with empty cells.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn empty() -> Dataset {
        Dataset::default()
    }

    pub fn num_columns(&self) -> usize {
        self.header.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    // The stored carts with padding dropped, as normalized item names.
    pub fn transactions(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().filter_map(|cell| normalize_item_name(cell)).collect())
            .collect()
    }

    fn from_rows(path: &Path, mut rows: Vec<Vec<String>>) -> Result<Dataset> {
        if rows.is_empty() {
            return Ok(Dataset::empty());
        }
        let header = rows.remove(0);
        if header.iter().all(|name| name.trim().is_empty()) {
            return Err(BasketError::storage_corrupt(path, "header row is blank"));
        }
        let num_columns = header.len();
        for (index, row) in rows.iter_mut().enumerate() {
            if row.len() > num_columns {
                return Err(BasketError::storage_corrupt(
                    path,
                    format!(
                        "row {} has {} cells but the header has {} columns",
                        index + 1,
                        row.len(),
                        num_columns
                    ),
                ));
            }
            row.resize(num_columns, String::new());
        }
        Ok(Dataset { header, rows })
    }
}

// Append-only CSV file of carts. All access goes through a single writer
// lock, so an append and the reload that follows it see a consistent file.
pub struct TransactionStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl TransactionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> TransactionStore {
        TransactionStore {
            path: path.as_ref().to_path_buf(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, cart: &[String]) -> Result<()> {
        let _guard = self.writer.lock();
        self.append_locked(cart)
    }

    pub fn load(&self) -> Result<Dataset> {
        let _guard = self.writer.lock();
        self.load_locked()
    }

    pub fn append_and_load(&self, cart: &[String]) -> Result<Dataset> {
        let _guard = self.writer.lock();
        self.append_locked(cart)?;
        self.load_locked()
    }

    fn load_locked(&self) -> Result<Dataset> {
        match self.read_contents()? {
            Some(contents) => self.parse(&contents),
            None => Ok(Dataset::empty()),
        }
    }

    fn parse(&self, contents: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let mut rows: Vec<Vec<String>> = vec![];
        for record in reader.records() {
            let record = record.map_err(|e| BasketError::storage_corrupt(&self.path, e.to_string()))?;
            rows.push(record.iter().map(String::from).collect());
        }
        Dataset::from_rows(&self.path, rows)
    }

    // None when there is no dataset yet. A zero-length file counts as absent.
    fn read_contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(ref contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BasketError::storage_io(&self.path, e)),
        }
    }

    fn append_locked(&self, cart: &[String]) -> Result<()> {
        if cart.is_empty() {
            return Err(BasketError::validation("cart", "cannot store an empty cart"));
        }

        let contents = match self.read_contents()? {
            Some(contents) => contents,
            None => {
                info!(
                    "Creating dataset {} with {} columns",
                    self.path.display(),
                    cart.len()
                );
                let header = column_names(0, cart.len());
                return self.rewrite(&header, &[], cart);
            }
        };

        let mut dataset = self.parse(&contents)?;
        if dataset.num_columns() == 0 {
            return Err(BasketError::storage_corrupt(&self.path, "missing header row"));
        }

        if cart.len() > dataset.num_columns() {
            info!(
                "Widening dataset {} from {} to {} columns",
                self.path.display(),
                dataset.num_columns(),
                cart.len()
            );
            let start = dataset.num_columns();
            dataset.header.extend(column_names(start, cart.len()));
            for row in dataset.rows.iter_mut() {
                row.resize(cart.len(), String::new());
            }
            return self.rewrite(&dataset.header, &dataset.rows, cart);
        }

        let mut row = cart.to_vec();
        row.resize(dataset.num_columns(), String::new());

        let append_row = || -> io::Result<()> {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            if !contents.ends_with('\n') {
                file.write_all(b"\n")?;
            }
            let mut writer = WriterBuilder::new().from_writer(file);
            writer.write_record(&row)?;
            writer.flush()
        };
        append_row().map_err(|e| BasketError::storage_io(&self.path, e))?;
        debug!("Appended {} item cart to {}", cart.len(), self.path.display());
        Ok(())
    }

    // Writes the whole dataset plus the new cart to a temporary file, then
    // renames it over the dataset so readers never see a half-written file.
    fn rewrite(&self, header: &[String], rows: &[Vec<String>], cart: &[String]) -> Result<()> {
        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let write_rows = || -> io::Result<()> {
            let mut writer = WriterBuilder::new().from_writer(File::create(&tmp_path)?);
            writer.write_record(header)?;
            for row in rows {
                writer.write_record(row)?;
            }
            let mut row = cart.to_vec();
            row.resize(header.len(), String::new());
            writer.write_record(&row)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        write_rows().map_err(|e| BasketError::storage_io(&self.path, e))
    }
}

// item_{start+1} .. item_{end}
fn column_names(start: usize, end: usize) -> Vec<String> {
    (start..end).map(|i| format!("item_{}", i + 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::{Dataset, TransactionStore};
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn cart(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_store() -> (TempDir, TransactionStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = TransactionStore::new(temp_dir.path().join("carts.csv"));
        (temp_dir, store)
    }

    #[test]
    fn test_load_missing_dataset_is_empty() {
        let (_temp_dir, store) = create_test_store();
        let dataset = store.load().unwrap();
        assert_eq!(dataset, Dataset::empty());
        assert_eq!(dataset.num_columns(), 0);
        assert!(dataset.transactions().is_empty());
    }

    #[test]
    fn test_first_append_sets_columns() {
        let (_temp_dir, store) = create_test_store();
        store.append(&cart(&["MILK", "BREAD", "EGGS"])).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "item_1,item_2,item_3\nMILK,BREAD,EGGS\n");

        let dataset = store.load().unwrap();
        assert_eq!(dataset.num_columns(), 3);
        assert_eq!(dataset.num_rows(), 1);
    }

    #[test]
    fn test_shorter_cart_is_padded() {
        let (_temp_dir, store) = create_test_store();
        store.append(&cart(&["MILK", "BREAD", "EGGS"])).unwrap();
        store.append(&cart(&["TEA"])).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "item_1,item_2,item_3\nMILK,BREAD,EGGS\nTEA,,\n");

        let dataset = store.load().unwrap();
        assert_eq!(dataset.rows()[1], cart(&["TEA", "", ""]));
        assert_eq!(dataset.transactions()[1], cart(&["TEA"]));
    }

    #[test]
    fn test_longer_cart_widens_schema() {
        let (_temp_dir, store) = create_test_store();
        store.append(&cart(&["MILK", "BREAD", "EGGS"])).unwrap();
        store.append(&cart(&["TEA", "JAM", "BUTTER"])).unwrap();
        store
            .append(&cart(&["RICE", "BEANS", "SALT", "OIL", "ONION"]))
            .unwrap();

        let dataset = store.load().unwrap();
        assert_eq!(dataset.num_columns(), 5);
        assert_eq!(
            dataset.header(),
            &cart(&["item_1", "item_2", "item_3", "item_4", "item_5"])[..]
        );
        assert_eq!(dataset.rows()[0], cart(&["MILK", "BREAD", "EGGS", "", ""]));
        assert_eq!(dataset.rows()[1], cart(&["TEA", "JAM", "BUTTER", "", ""]));
        assert_eq!(
            dataset.rows()[2],
            cart(&["RICE", "BEANS", "SALT", "OIL", "ONION"])
        );
        let mut tmp = store.path().as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!std::path::Path::new(&tmp).exists());
    }

    #[test]
    fn test_schema_grows_monotonically() {
        let (_temp_dir, store) = create_test_store();
        let carts = vec![
            cart(&["A", "B"]),
            cart(&["C"]),
            cart(&["D", "E", "F", "G"]),
            cart(&["H", "I", "J"]),
            cart(&["K", "L", "M", "N", "O", "P"]),
            cart(&["Q"]),
        ];
        let mut previous = Dataset::empty();
        let mut longest = 0;
        for (n, c) in carts.iter().enumerate() {
            longest = longest.max(c.len());
            let dataset = store.append_and_load(c).unwrap();
            assert_eq!(dataset.num_columns(), longest);
            assert_eq!(dataset.num_rows(), n + 1);
            // No previously stored cell changes.
            for (old_row, new_row) in previous.rows().iter().zip(dataset.rows()) {
                assert_eq!(&new_row[..old_row.len()], &old_row[..]);
                assert!(new_row[old_row.len()..].iter().all(|cell| cell.is_empty()));
            }
            previous = dataset;
        }
    }

    #[test]
    fn test_cells_with_commas_and_quotes() {
        let (_temp_dir, store) = create_test_store();
        let items = cart(&["CHEESE, CHEDDAR", "12\" PIZZA"]);
        store.append(&items).unwrap();
        let dataset = store.load().unwrap();
        assert_eq!(dataset.transactions(), vec![items]);
    }

    #[test]
    fn test_existing_file_without_trailing_newline() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "item_1,item_2\nmilk,bread").unwrap();
        store.append(&cart(&["EGGS"])).unwrap();
        let dataset = store.load().unwrap();
        assert_eq!(dataset.num_rows(), 2);
        assert_eq!(
            dataset.transactions(),
            vec![cart(&["MILK", "BREAD"]), cart(&["EGGS"])]
        );
    }

    #[test]
    fn test_corrupt_dataset() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "item_1\nMILK,BREAD,EGGS\n").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.is_storage_error());
        assert!(err.to_string().contains("row 1 has 3 cells"));

        assert!(store.append(&cart(&["TEA"])).unwrap_err().is_storage_error());

        fs::write(store.path(), b"item_1,item_2\nMILK,\xff\xfe\n").unwrap();
        assert!(store.load().unwrap_err().is_storage_error());
    }

    #[test]
    fn test_unreadable_dataset() {
        let (temp_dir, _) = create_test_store();
        // A directory can't be read as a file.
        let store = TransactionStore::new(temp_dir.path());
        assert!(store.load().unwrap_err().is_storage_error());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.append(&[]).unwrap_err().is_client_error());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_concurrent_appends() {
        let (_temp_dir, store) = create_test_store();
        let store = Arc::new(store);
        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let items: Vec<String> = (0..n).map(|i| format!("ITEM{}", i)).collect();
                    store.append_and_load(&items).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let dataset = store.load().unwrap();
        assert_eq!(dataset.num_columns(), 8);
        assert_eq!(dataset.num_rows(), 8);
        let mut lengths: Vec<usize> = dataset.transactions().iter().map(|t| t.len()).collect();
        lengths.sort();
        assert_eq!(lengths, (1..=8).collect::<Vec<usize>>());
    }

    #[test]
    fn test_quoted_cells_survive_reload_and_append() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.path(),
            "item_1,item_2\r\n\"multi\nline\",x\r\n\r\n\"a,b\",\"c\"\"d\"\n",
        )
        .unwrap();
        let expected = vec![cart(&["multi\nline", "x"]), cart(&["a,b", "c\"d"])];
        assert_eq!(store.load().unwrap().rows(), &expected[..]);

        store.append(&cart(&["TEA, GREEN"])).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.ends_with("\"TEA, GREEN\",\n"));
        let dataset = store.load().unwrap();
        assert_eq!(&dataset.rows()[..2], &expected[..]);
        assert_eq!(dataset.rows()[2], cart(&["TEA, GREEN", ""]));

        // Widening rewrites every row through the same quoting.
        store.append(&cart(&["A", "B", "C"])).unwrap();
        let dataset = store.load().unwrap();
        assert_eq!(dataset.rows()[0], cart(&["multi\nline", "x", ""]));
        assert_eq!(dataset.rows()[1], cart(&["a,b", "c\"d", ""]));
        assert_eq!(dataset.rows()[2], cart(&["TEA, GREEN", "", ""]));
    }
}
