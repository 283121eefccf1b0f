//! # Workbook Data Structures
//!
//! The `Workbook` is the root container for a shop's data: its shape and
//! roll catalog, settings, and saved projects (estimates kept for later).
//! Workbooks serialize to `.rcw` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Workbook
//! ├── meta: WorkbookMetadata (version, owner, company, timestamps)
//! ├── settings: ShopSettings (currency, default margin, units)
//! ├── shapes: HashMap<Uuid, Shape>
//! ├── rolls: HashMap<Uuid, Roll>
//! └── projects: HashMap<Uuid, SavedProject>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{Roll, Shape};
//! use calc_core::workbook::Workbook;
//!
//! let mut workbook = Workbook::new("Ana", "Print Corner");
//! let roll_id = workbook.add_roll(Roll::new("Paper 100", 100.0, 50.0, 500.0)).unwrap();
//! let mug_id = workbook.add_shape(Shape::new("Mug", 25.0, 10.0)).unwrap();
//!
//! let input = workbook.build_input(roll_id, &[(mug_id, 12)], None, None).unwrap();
//! let project_id = workbook.save_project("Mugs for Joe", "ana", input).unwrap();
//! assert!(workbook.get_project(&project_id).is_some());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{self, CatalogStats};
use crate::calculations::cost::CommercialParameters;
use crate::calculations::estimate::{calculate, EstimateInput, EstimateResult};
use crate::calculations::layout::LineItem;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{Roll, Shape};
use crate::units::UnitConvention;

/// Current schema version for .rcw files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default page size for [`Workbook::list_projects`]
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Root workbook container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    /// Workbook metadata (version, owner, company)
    pub meta: WorkbookMetadata,

    /// Shop-wide defaults
    pub settings: ShopSettings,

    /// Shape catalog, keyed by UUID
    pub shapes: HashMap<Uuid, Shape>,

    /// Roll catalog, keyed by UUID
    pub rolls: HashMap<Uuid, Roll>,

    /// Saved projects, keyed by UUID
    pub projects: HashMap<Uuid, SavedProject>,
}

impl Workbook {
    /// Create a new empty workbook.
    pub fn new(owner: impl Into<String>, company: impl Into<String>) -> Self {
        let now = Utc::now();
        Workbook {
            meta: WorkbookMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner: owner.into(),
                company: company.into(),
                created: now,
                modified: now,
            },
            settings: ShopSettings::default(),
            shapes: HashMap::new(),
            rolls: HashMap::new(),
            projects: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Validate and add a shape to the catalog.
    ///
    /// The name is trimmed and must not clash with another shape.
    /// Returns the UUID assigned to the shape.
    pub fn add_shape(&mut self, mut shape: Shape) -> CalcResult<Uuid> {
        self.check_shape(&mut shape, None)?;
        let id = Uuid::new_v4();
        shape.id = Some(id);
        self.shapes.insert(id, shape);
        self.touch();
        Ok(id)
    }

    /// Validate and add a roll to the catalog.
    pub fn add_roll(&mut self, mut roll: Roll) -> CalcResult<Uuid> {
        self.check_roll(&mut roll, None)?;
        let id = Uuid::new_v4();
        roll.id = Some(id);
        self.rolls.insert(id, roll);
        self.touch();
        Ok(id)
    }

    /// Replace a catalog shape, keeping its id.
    ///
    /// # Errors
    ///
    /// * `NotFound` - no shape with this id
    /// * `InvalidDimension` - the new dimensions are invalid
    /// * `DuplicateName` - another shape already has the new name
    pub fn update_shape(&mut self, id: Uuid, mut shape: Shape) -> CalcResult<()> {
        if !self.shapes.contains_key(&id) {
            return Err(CalcError::not_found("Shape", id));
        }
        self.check_shape(&mut shape, Some(id))?;
        shape.id = Some(id);
        self.shapes.insert(id, shape);
        self.touch();
        Ok(())
    }

    /// Replace a catalog roll, keeping its id. Errors as [`Workbook::update_shape`].
    pub fn update_roll(&mut self, id: Uuid, mut roll: Roll) -> CalcResult<()> {
        if !self.rolls.contains_key(&id) {
            return Err(CalcError::not_found("Roll", id));
        }
        self.check_roll(&mut roll, Some(id))?;
        roll.id = Some(id);
        self.rolls.insert(id, roll);
        self.touch();
        Ok(())
    }

    fn check_shape(&self, shape: &mut Shape, except: Option<Uuid>) -> CalcResult<()> {
        shape.name = shape.name.trim().to_string();
        shape.validate()?;
        let names = self.shapes.iter().map(|(id, s)| (*id, s.name.as_str()));
        if name_in_use(names, &shape.name, except) {
            return Err(CalcError::duplicate_name("Shape", shape.name.as_str()));
        }
        Ok(())
    }

    fn check_roll(&self, roll: &mut Roll, except: Option<Uuid>) -> CalcResult<()> {
        roll.name = roll.name.trim().to_string();
        roll.validate()?;
        let names = self.rolls.iter().map(|(id, r)| (*id, r.name.as_str()));
        if name_in_use(names, &roll.name, except) {
            return Err(CalcError::duplicate_name("Roll", roll.name.as_str()));
        }
        Ok(())
    }

    /// Remove a shape from the catalog. Saved projects keep their own copy.
    pub fn remove_shape(&mut self, id: &Uuid) -> Option<Shape> {
        let shape = self.shapes.remove(id);
        if shape.is_some() {
            self.touch();
        }
        shape
    }

    /// Remove a roll from the catalog. Saved projects keep their own copy.
    pub fn remove_roll(&mut self, id: &Uuid) -> Option<Roll> {
        let roll = self.rolls.remove(id);
        if roll.is_some() {
            self.touch();
        }
        roll
    }

    pub fn get_shape(&self, id: &Uuid) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_roll(&self, id: &Uuid) -> Option<&Roll> {
        self.rolls.get(id)
    }

    /// Catalog shapes ordered by name.
    pub fn list_shapes(&self) -> Vec<&Shape> {
        let mut shapes: Vec<&Shape> = self.shapes.values().collect();
        shapes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        shapes
    }

    /// Catalog rolls ordered by name.
    pub fn list_rolls(&self) -> Vec<&Roll> {
        let mut rolls: Vec<&Roll> = self.rolls.values().collect();
        rolls.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rolls
    }

    /// Area overview of the shape catalog
    pub fn shape_stats(&self) -> CatalogStats {
        analytics::shape_stats(self.shapes.values())
    }

    /// Width overview of the roll catalog
    pub fn roll_stats(&self) -> CatalogStats {
        analytics::roll_stats(self.rolls.values())
    }

    /// Build an estimate request from catalog ids.
    ///
    /// Missing commercial parameters come from [`ShopSettings`].
    ///
    /// # Errors
    ///
    /// * `NotFound` - an id is not in the catalog
    pub fn build_input(
        &self,
        roll_id: Uuid,
        items: &[(Uuid, u32)],
        profit_margin_percent: Option<f64>,
        additional_cost: Option<f64>,
    ) -> CalcResult<EstimateInput> {
        let roll = self
            .get_roll(&roll_id)
            .cloned()
            .ok_or_else(|| CalcError::not_found("Roll", roll_id))?;

        let line_items = items
            .iter()
            .map(|(shape_id, quantity)| {
                self.get_shape(shape_id)
                    .cloned()
                    .map(|shape| LineItem::new(shape, *quantity))
                    .ok_or_else(|| CalcError::not_found("Shape", shape_id))
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let params = CommercialParameters::new(
            profit_margin_percent.unwrap_or(self.settings.default_profit_margin_percent),
            additional_cost.unwrap_or(self.settings.default_additional_cost),
        );

        Ok(EstimateInput::new(roll, line_items, params).with_units(self.settings.units))
    }

    /// Calculate an estimate and store it as a project.
    ///
    /// Failed estimates are not stored; the error is returned instead.
    pub fn save_project(
        &mut self,
        name: impl Into<String>,
        created_by: impl Into<String>,
        input: EstimateInput,
    ) -> CalcResult<Uuid> {
        let result = calculate(&input)?;
        let id = Uuid::new_v4();
        let project = SavedProject {
            id,
            name: name.into(),
            created_by: created_by.into(),
            input,
            result,
            saved_at: Utc::now(),
        };
        log::info!("saved project '{}' ({})", project.name, id);
        self.projects.insert(id, project);
        self.touch();
        Ok(id)
    }

    /// Store an already calculated project as-is.
    pub fn insert_project(&mut self, project: SavedProject) -> Uuid {
        let id = project.id;
        self.projects.insert(id, project);
        self.touch();
        id
    }

    pub fn remove_project(&mut self, id: &Uuid) -> Option<SavedProject> {
        let project = self.projects.remove(id);
        if project.is_some() {
            self.touch();
        }
        project
    }

    pub fn get_project(&self, id: &Uuid) -> Option<&SavedProject> {
        self.projects.get(id)
    }

    /// Search, sort (newest first) and paginate saved projects.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calc_core::workbook::{ProjectQuery, Workbook};
    ///
    /// let workbook = Workbook::new("Ana", "Print Corner");
    /// let page = workbook.list_projects(&ProjectQuery::default());
    /// assert_eq!(page.total, 0);
    /// assert_eq!(page.total_pages, 0);
    /// ```
    pub fn list_projects(&self, query: &ProjectQuery) -> ProjectPage {
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matching: Vec<&SavedProject> = self
            .projects
            .values()
            .filter(|p| match &needle {
                Some(needle) => p.name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.name.cmp(&b.name)));

        let limit = query.limit.max(1);
        let page = query.page.max(1);
        let total = matching.len();
        let total_pages = total.div_ceil(limit);

        let projects = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        ProjectPage {
            projects,
            total,
            page,
            total_pages,
        }
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

/// Unnamed entries never clash.
fn name_in_use<'a>(
    mut names: impl Iterator<Item = (Uuid, &'a str)>,
    name: &str,
    except: Option<Uuid>,
) -> bool {
    !name.is_empty() && names.any(|(id, existing)| Some(id) != except && existing == name)
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new("", "")
    }
}

/// Workbook metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Person responsible for the workbook
    pub owner: String,

    /// Shop / company name
    pub company: String,

    /// When the workbook was created
    pub created: DateTime<Utc>,

    /// When the workbook was last modified
    pub modified: DateTime<Utc>,
}

/// Shop-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// ISO currency code used for display (e.g., "BRL", "USD")
    pub currency: String,

    /// Margin used when a request does not give one
    pub default_profit_margin_percent: f64,

    /// Additional cost used when a request does not give one
    pub default_additional_cost: f64,

    /// Units the catalog is measured in
    pub units: UnitConvention,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            currency: "BRL".to_string(),
            default_profit_margin_percent: 30.0,
            default_additional_cost: 0.0,
            units: UnitConvention::default(),
        }
    }
}

/// A successful estimate kept in the workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedProject {
    pub id: Uuid,
    pub name: String,
    pub created_by: String,
    /// The request exactly as calculated (catalog changes do not affect it)
    pub input: EstimateInput,
    pub result: EstimateResult,
    pub saved_at: DateTime<Utc>,
}

/// Filter and paging for [`Workbook::list_projects`]. Pages are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectQuery {
    /// Case-insensitive substring of the project name
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        ProjectQuery {
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of saved projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPage {
    pub projects: Vec<SavedProject>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}
