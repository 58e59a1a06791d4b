//! Expense service
//!
//! Creates, edits and deletes expenses. The acting member is always the
//! payer; splits come from the split calculator and are replaced wholesale
//! on every edit. Only the creator may change an expense, and nobody may
//! once another member has settled their share.

use chrono::{NaiveDate, Utc};

use crate::audit::{generate_diff, EntityType};
use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Expense, ExpenseId, GroupId, LedgerContext, MemberId, Money, SplitMethod};
use crate::storage::Storage;

use super::splitter::{
    build_splits, calculate_shares, check_items_total, ExactShare, PercentageShare, SplitParams,
};

/// Where an expense is shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseScope {
    /// Split among the members of a group
    Group(GroupId),

    /// Split between the payer and these members outside any group
    Friends(Vec<MemberId>),
}

/// Input for creating an expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub scope: ExpenseScope,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub params: SplitParams,
}

/// Changes to an existing expense; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub params: Option<SplitParams>,
}

pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense paid by `actor`
    pub fn create(&self, actor: MemberId, input: CreateExpenseInput) -> SplitbookResult<Expense> {
        let (group_id, members) = self.participants(actor, &input.scope)?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let mut expense = Expense::new(
            group_id,
            input.description.trim(),
            category_or_default(&input.category),
            date,
            input.amount,
            actor,
        );
        apply_split(&mut expense, &members, input.params)?;

        expense
            .validate()
            .map_err(|e| SplitbookError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        tracing::debug!(expense = %expense.id, splits = expense.splits.len(), "created expense");

        Ok(expense)
    }

    /// Edit an expense and recompute its splits
    ///
    /// Without new split parameters the current method is reapplied with
    /// the shares already stored on the expense.
    pub fn update(
        &self,
        id: ExpenseId,
        actor: MemberId,
        input: UpdateExpenseInput,
    ) -> SplitbookResult<Expense> {
        let mut expense = self.get(id)?;
        ensure_editable(&expense, actor, "edit")?;

        let before = expense.clone();

        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = input.amount {
            expense.amount = amount;
        }
        if let Some(category) = input.category {
            expense.category = category_or_default(&category).to_string();
        }
        if let Some(date) = input.date {
            expense.date = date;
        }

        let params = match input.params {
            Some(params) => params,
            None => current_params(&expense),
        };
        let members = self.current_members(&expense)?;
        apply_split(&mut expense, &members, params)?;

        expense
            .validate()
            .map_err(|e| SplitbookError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        let diff = generate_diff(
            &serde_json::to_value(&before)?,
            &serde_json::to_value(&expense)?,
        );
        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
            diff,
        )?;

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId, actor: MemberId) -> SplitbookResult<Expense> {
        let expense = self.get(id)?;
        ensure_editable(&expense, actor, "delete")?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> SplitbookResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| SplitbookError::expense_not_found(id.to_string()))
    }

    /// Find an expense by short or full ID
    pub fn resolve(&self, reference: &str) -> SplitbookResult<Expense> {
        self.storage
            .expenses
            .find(reference.trim())?
            .ok_or_else(|| SplitbookError::expense_not_found(reference))
    }

    /// Expenses of a context, or every expense involving `member`
    pub fn list(
        &self,
        context: Option<&LedgerContext>,
        member: MemberId,
    ) -> SplitbookResult<Vec<Expense>> {
        match context {
            Some(context) => self.storage.expenses.get_for_context(context),
            None => self.storage.expenses.get_for_member(member),
        }
    }

    /// Resolve who shares a new expense
    fn participants(
        &self,
        actor: MemberId,
        scope: &ExpenseScope,
    ) -> SplitbookResult<(Option<GroupId>, Vec<MemberId>)> {
        match scope {
            ExpenseScope::Group(group_id) => {
                let group = self
                    .storage
                    .groups
                    .get(*group_id)?
                    .ok_or_else(|| SplitbookError::group_not_found(group_id.to_string()))?;
                if !group.has_member(actor) {
                    return Err(SplitbookError::Forbidden(format!(
                        "not a member of group {}",
                        group.name
                    )));
                }
                Ok((Some(group.id), group.members))
            }
            ExpenseScope::Friends(friends) => {
                if friends.is_empty() {
                    return Err(SplitbookError::Validation(
                        "a friend expense needs at least one other member".into(),
                    ));
                }
                let mut members = vec![actor];
                for &friend in friends {
                    if friend == actor {
                        return Err(SplitbookError::Validation(
                            "cannot share an expense with yourself".into(),
                        ));
                    }
                    if self.storage.members.get(friend)?.is_none() {
                        return Err(SplitbookError::member_not_found(friend.to_string()));
                    }
                    if !members.contains(&friend) {
                        members.push(friend);
                    }
                }
                Ok((None, members))
            }
        }
    }

    /// Members an existing expense is split among
    fn current_members(&self, expense: &Expense) -> SplitbookResult<Vec<MemberId>> {
        match expense.group_id {
            Some(group_id) => Ok(self
                .storage
                .groups
                .get(group_id)?
                .ok_or_else(|| SplitbookError::group_not_found(group_id.to_string()))?
                .members),
            None => {
                let mut members = vec![expense.created_by];
                members.extend(expense.participants().filter(|&m| m != expense.created_by));
                Ok(members)
            }
        }
    }
}

fn category_or_default(category: &str) -> &str {
    let category = category.trim();
    if category.is_empty() {
        "general"
    } else {
        category
    }
}

fn ensure_editable(expense: &Expense, actor: MemberId, action: &str) -> SplitbookResult<()> {
    if expense.created_by != actor {
        return Err(SplitbookError::Forbidden(format!(
            "only the member who paid can {} this expense",
            action
        )));
    }
    if expense.is_locked() {
        return Err(SplitbookError::Locked(format!(
            "cannot {} expense with settled splits",
            action
        )));
    }
    Ok(())
}

/// Run the calculator and store its result on the expense
fn apply_split(
    expense: &mut Expense,
    members: &[MemberId],
    params: SplitParams,
) -> SplitbookResult<()> {
    if let SplitParams::Itemized(items) = &params {
        check_items_total(items, expense.amount)?;
    }

    let shares = calculate_shares(expense.amount, members, expense.created_by, &params)?;
    let splits = build_splits(&shares, expense.created_by);
    let method = params.method();
    let items = match params {
        SplitParams::Itemized(items) => items,
        _ => Vec::new(),
    };

    expense.replace_splits(method, splits, items);
    Ok(())
}

/// Rebuild split parameters from the shares stored on an expense
fn current_params(expense: &Expense) -> SplitParams {
    match expense.split_method {
        SplitMethod::Equal => SplitParams::Equal,
        SplitMethod::Percentage => SplitParams::Percentage(
            expense
                .splits
                .iter()
                .map(|s| PercentageShare {
                    member_id: s.member_id,
                    percentage: s.percentage.unwrap_or_default(),
                })
                .collect(),
        ),
        SplitMethod::Exact => SplitParams::Exact(
            expense
                .splits
                .iter()
                .map(|s| ExactShare {
                    member_id: s.member_id,
                    amount: s.amount,
                })
                .collect(),
        ),
        SplitMethod::Itemized => SplitParams::Itemized(expense.items.clone()),
    }
}
