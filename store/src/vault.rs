//! The command/category store.
//!
//! Every mutation builds the next version of the affected collection, hands it
//! to the backend, and only swaps it in (and notifies listeners) once the write
//! succeeded. A failed write leaves memory exactly as it was.

use crate::error::Result;
use crate::error::StoreError;
use crate::id::next_id;
use crate::notify::Listeners;
use crate::notify::SubscriptionId;
use crate::store::StoreBackend;
use crate::types::Category;
use crate::types::Command;
use crate::types::Timestamp;
use chrono::Local;
use chrono::Utc;

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

pub struct CommandStore {
    backend: Box<dyn StoreBackend>,
    /// Newest first.
    commands: Vec<Command>,
    /// Creation order.
    categories: Vec<Category>,
    listeners: Listeners,
}

impl CommandStore {
    /// Load both collections from `backend`. Unreadable data is logged and
    /// treated as empty.
    pub fn open(backend: Box<dyn StoreBackend>) -> Self {
        let commands = load_or_empty("commands", backend.load_commands());
        let categories = load_or_empty("categories", backend.load_categories());
        tracing::debug!(
            "vault loaded: {} commands, {} categories",
            commands.len(),
            categories.len()
        );
        Self {
            backend,
            commands,
            categories,
            listeners: Listeners::default(),
        }
    }

    // ---- notifications -------------------------------------------------

    /// Single-slot registration: replaces every existing listener.
    pub fn set_update_callback<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.replace(callback)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ---- commands ------------------------------------------------------

    pub fn add_command(&mut self, content: &str, category: &str, alias: &str) -> Result<Command> {
        if !self.validate_alias(alias, None) {
            return Err(StoreError::DuplicateAlias(alias.to_string()));
        }
        let command = Command {
            id: self.generate_id(),
            content: content.to_string(),
            category: category.to_string(),
            alias: alias.to_string(),
            created_at: now(),
        };
        let mut next = Vec::with_capacity(self.commands.len() + 1);
        next.push(command.clone());
        next.extend(self.commands.iter().cloned());
        self.commit_commands(next)?;
        Ok(command)
    }

    pub fn add_command_with_category(&mut self, content: &str, category: &str) -> Result<Command> {
        self.add_command(content, category, "")
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Result<&Command> {
        let idx = self.command_index(id)?;
        Ok(&self.commands[idx])
    }

    pub fn delete_command(&mut self, id: &str) -> Result<()> {
        let idx = self.command_index(id)?;
        let mut next = self.commands.clone();
        next.remove(idx);
        self.commit_commands(next)
    }

    pub fn update_command(
        &mut self,
        id: &str,
        content: &str,
        category: &str,
        alias: &str,
    ) -> Result<Command> {
        let idx = self.command_index(id)?;
        if !alias.is_empty()
            && alias != self.commands[idx].alias
            && !self.validate_alias(alias, Some(id))
        {
            return Err(StoreError::DuplicateAlias(alias.to_string()));
        }
        let mut next = self.commands.clone();
        let cmd = &mut next[idx];
        cmd.content = content.to_string();
        cmd.category = category.to_string();
        cmd.alias = alias.to_string();
        let updated = cmd.clone();
        self.commit_commands(next)?;
        Ok(updated)
    }

    pub fn update_command_category(&mut self, id: &str, category: &str) -> Result<()> {
        let idx = self.command_index(id)?;
        let mut next = self.commands.clone();
        next[idx].category = category.to_string();
        self.commit_commands(next)
    }

    /// An empty alias never matches.
    pub fn command_by_alias(&self, alias: &str) -> Result<&Command> {
        if alias.is_empty() {
            return Err(StoreError::alias_not_found(alias));
        }
        self.commands
            .iter()
            .find(|c| c.alias == alias)
            .ok_or_else(|| StoreError::alias_not_found(alias))
    }

    /// `true` if `alias` is empty or held by no command other than
    /// `exclude_id`.
    pub fn validate_alias(&self, alias: &str, exclude_id: Option<&str>) -> bool {
        if alias.is_empty() {
            return true;
        }
        !self
            .commands
            .iter()
            .any(|c| c.alias == alias && Some(c.id.as_str()) != exclude_id)
    }

    /// Empty `category_id` selects uncategorized commands.
    pub fn commands_by_category(&self, category_id: &str) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| c.category == category_id)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&Command> {
        crate::search::search(&self.commands, &self.categories, query)
    }

    // ---- categories ----------------------------------------------------

    /// Returns the existing category unchanged if one already has `name`.
    pub fn create_category(&mut self, name: &str, color: &str) -> Result<Category> {
        if let Some(existing) = self.categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }
        let category = Category {
            id: self.generate_id(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: now(),
        };
        let mut next = self.categories.clone();
        next.push(category.clone());
        self.commit_categories(next)?;
        Ok(category)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Result<&Category> {
        let idx = self.category_index(id)?;
        Ok(&self.categories[idx])
    }

    pub fn update_category(&mut self, id: &str, name: &str, color: &str) -> Result<Category> {
        let idx = self.category_index(id)?;
        let mut next = self.categories.clone();
        next[idx].name = name.to_string();
        next[idx].color = color.to_string();
        let updated = next[idx].clone();
        self.commit_categories(next)?;
        Ok(updated)
    }

    /// Move every command in `id` to `reassign_to` (empty = uncategorized),
    /// then remove the category.
    pub fn delete_category(&mut self, id: &str, reassign_to: &str) -> Result<()> {
        let idx = self.category_index(id)?;
        if id == reassign_to {
            return Err(StoreError::SelfReassign(id.to_string()));
        }
        let mut commands = self.commands.clone();
        let moved = reassign(&mut commands, id, reassign_to);
        let mut categories = self.categories.clone();
        categories.remove(idx);
        tracing::debug!("deleting category {id}: {moved} commands moved to '{reassign_to}'");
        self.commit_both(commands, categories)
    }

    /// Fold `source_id` into `target_id`; `source_id` is deleted.
    pub fn merge_categories(&mut self, source_id: &str, target_id: &str) -> Result<()> {
        self.category_index(source_id)?;
        self.category_index(target_id)?;
        if source_id == target_id {
            return Err(StoreError::SelfReassign(source_id.to_string()));
        }
        self.delete_category(source_id, target_id)
    }

    /// Display label for a command's category field.
    pub fn category_label(&self, category_id: &str) -> &str {
        if category_id.is_empty() {
            return UNCATEGORIZED_LABEL;
        }
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY_LABEL)
    }

    // ---- internals -----------------------------------------------------

    fn command_index(&self, id: &str) -> Result<usize> {
        self.commands
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::command_not_found(id))
    }

    fn category_index(&self, id: &str) -> Result<usize> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::category_not_found(id))
    }

    /// Unique across both collections.
    fn generate_id(&self) -> String {
        next_id(Utc::now(), |candidate| {
            self.commands.iter().any(|c| c.id == candidate)
                || self.categories.iter().any(|c| c.id == candidate)
        })
    }

    fn commit_commands(&mut self, next: Vec<Command>) -> Result<()> {
        self.backend.save_commands(&next)?;
        self.commands = next;
        self.listeners.emit();
        Ok(())
    }

    fn commit_categories(&mut self, next: Vec<Category>) -> Result<()> {
        self.backend.save_categories(&next)?;
        self.categories = next;
        self.listeners.emit();
        Ok(())
    }

    /// Commands are written first; if the categories write then fails the old
    /// commands are put back so both files agree with memory again.
    fn commit_both(&mut self, commands: Vec<Command>, categories: Vec<Category>) -> Result<()> {
        self.backend.save_commands(&commands)?;
        if let Err(err) = self.backend.save_categories(&categories) {
            if let Err(restore) = self.backend.save_commands(&self.commands) {
                tracing::warn!("failed to restore commands after a failed write: {restore}");
            }
            return Err(err);
        }
        self.commands = commands;
        self.categories = categories;
        self.listeners.emit();
        Ok(())
    }
}

fn now() -> Timestamp {
    Local::now().fixed_offset()
}

fn reassign(commands: &mut [Command], from: &str, to: &str) -> usize {
    let mut moved = 0;
    for cmd in commands.iter_mut().filter(|c| c.category == from) {
        cmd.category = to.to_string();
        moved += 1;
    }
    moved
}

fn load_or_empty<T>(what: &str, loaded: Result<Vec<T>>) -> Vec<T> {
    match loaded {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("starting with no {what}: {e}");
            Vec::new()
        }
    }
}
