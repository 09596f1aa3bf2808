use crate::core::pipeline::Generator;
use crate::core::{ConfigProvider, Gender, Storage};
use crate::domain::model::{Entry, PersonPage, Preferences, SavedPerson};
use crate::utils::error::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

pub const PREFERENCES_KEY: &str = "personnummer";
pub const ENTRIES_KEY: &str = "entries";
pub const NAMES_KEY: &str = "names";

/// Candidate browser with marked entries and saved people kept in a
/// [`Storage`].
///
/// Talks to the generator only through `generate(date, gender)`; everything
/// persisted is plain JSON under three keys.
pub struct Browser<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    generator: Generator,
    rng: StdRng,
}

impl<S: Storage, C: ConfigProvider> Browser<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let generator = Generator::from_config(&config);
        let rng = generator.rng();
        Self {
            storage,
            config,
            generator,
            rng,
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// 讀取失敗或內容損毀時回傳 fallback
    fn get_data<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!("Could not read '{}', using default: {}", key, e);
                return fallback;
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Stored '{}' is not valid JSON, using default: {}", key, e);
                fallback
            }
        }
    }

    fn set_data<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.storage.write(key, &json)
    }

    pub fn preferences(&self) -> Preferences {
        self.get_data(
            PREFERENCES_KEY,
            Preferences {
                date: self.config.default_date().to_string(),
                gender: self.config.default_gender().to_string(),
            },
        )
    }

    pub fn marked_entries(&self) -> HashSet<String> {
        self.get_data::<Vec<String>>(ENTRIES_KEY, Vec::new())
            .into_iter()
            .collect()
    }

    pub fn saved_people(&self) -> Vec<SavedPerson> {
        self.get_data(NAMES_KEY, Vec::new())
    }

    fn entries(
        &self,
        date: &str,
        gender: &str,
        skip: usize,
        marked: &HashSet<String>,
    ) -> Result<Vec<Entry>> {
        let numbers = self
            .generator
            .page(date, gender, skip, self.config.page_size())?;

        Ok(numbers
            .into_iter()
            .map(|number| {
                let value = number.to_string();
                let checked = marked.contains(&value);
                Entry { value, checked }
            })
            .collect())
    }

    /// A page at a random offset for `date`/`gender`.
    ///
    /// Returns `Ok(None)` without touching storage when either input is
    /// empty. Otherwise the inputs become the stored preferences.
    pub fn refresh(&mut self, date: &str, gender: &str) -> Result<Option<Vec<Entry>>> {
        if date.trim().is_empty() || gender.trim().is_empty() {
            return Ok(None);
        }

        self.set_data(
            PREFERENCES_KEY,
            &Preferences {
                date: date.to_string(),
                gender: gender.to_string(),
            },
        )?;

        let skip = self.rng.random_range(0..self.config.random_skip_max().max(1));
        tracing::debug!("Refreshing {} {} at offset {}", date, gender, skip);

        let marked = self.marked_entries();
        self.entries(date, gender, skip, &marked).map(Some)
    }

    pub fn mark_entry(&self, value: &str, checked: bool) -> Result<()> {
        let mut entries: Vec<String> = self.get_data(ENTRIES_KEY, Vec::new());
        if checked {
            if !entries.iter().any(|v| v == value) {
                entries.push(value.to_string());
            }
        } else {
            entries.retain(|v| v != value);
        }
        self.set_data(ENTRIES_KEY, &entries)
    }

    /// Returns `Ok(false)` when any field is empty.
    pub fn save_person(&self, name: &str, date: &str, gender: &str) -> Result<bool> {
        if name.trim().is_empty() || date.trim().is_empty() || gender.trim().is_empty() {
            return Ok(false);
        }
        self.generator.parse_date(date)?;
        Gender::parse(gender)?;

        let mut people = self.saved_people();
        people.push(SavedPerson {
            name: name.to_string(),
            date: date.to_string(),
            gender: gender.to_string(),
            offset: 0,
            saved_at: Utc::now(),
        });
        self.set_data(NAMES_KEY, &people)?;
        tracing::info!("Saved person '{}' ({} {})", name, date, gender);
        Ok(true)
    }

    /// 刪除所有同名的人，回傳刪除數量
    pub fn delete_person(&self, name: &str) -> Result<usize> {
        let mut people = self.saved_people();
        let before = people.len();
        people.retain(|p| p.name != name);
        self.set_data(NAMES_KEY, &people)?;
        Ok(before - people.len())
    }

    /// Shifts the offset of every person called `name` by `delta`.
    ///
    /// The offset may go negative; a negative offset skips nothing.
    pub fn load_more(&self, name: &str, delta: i64) -> Result<bool> {
        let mut people = self.saved_people();
        let mut found = false;
        for person in people.iter_mut().filter(|p| p.name == name) {
            person.offset = person.offset.saturating_add(delta);
            found = true;
        }
        if found {
            self.set_data(NAMES_KEY, &people)?;
        }
        Ok(found)
    }

    pub fn next_page(&self, name: &str) -> Result<bool> {
        self.load_more(name, self.config.page_size() as i64)
    }

    pub fn previous_page(&self, name: &str) -> Result<bool> {
        self.load_more(name, -(self.config.page_size() as i64))
    }

    /// Every saved person with the page at their current offset.
    pub fn people(&self) -> Vec<PersonPage> {
        let marked = self.marked_entries();

        self.saved_people()
            .into_iter()
            .map(|person| {
                let skip = person.offset.max(0) as usize;
                let entries = match self.entries(&person.date, &person.gender, skip, &marked) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!("Cannot list numbers for '{}': {}", person.name, e);
                        Vec::new()
                    }
                };
                PersonPage { person, entries }
            })
            .collect()
    }
}
