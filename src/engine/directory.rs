//! Employee directory operations and caller-to-employee resolution.

use chrono::NaiveDate;
use tracing::info;

use super::Engine;
use crate::error::{EngineError, EngineResult};
use crate::models::{Caller, Employee, EmployeeInput, Role, User};
use crate::store::RecordStore;

/// Lock key serializing directory writes that claim `email`.
fn email_lock_key(email: &str) -> String {
    format!("email:{}", email.trim().to_lowercase())
}

impl<S: RecordStore> Engine<S> {
    /// Returns the employee profile linked to `user_id`.
    ///
    /// A login that exists but is disabled may not act on its profile.
    pub(crate) fn employee_for_user(&self, user_id: &str) -> EngineResult<Employee> {
        if let Some(user) = self.store.get_by_id::<User>(user_id)? {
            if !user.is_active {
                return Err(EngineError::Unauthorized {
                    role: user.role.to_string(),
                    operation: "act with a disabled login",
                });
            }
        }

        self.store
            .find(|e: &Employee| e.user_id.as_deref() == Some(user_id))?
            .ok_or_else(|| EngineError::NotFound {
                entity: "Employee profile",
                id: user_id.to_string(),
            })
    }

    /// Resolves which employee a caller acts on.
    ///
    /// Staff always act on their own profile and `requested` is ignored.
    /// Other roles must name an existing employee.
    pub(crate) fn target_employee(
        &self,
        caller: &Caller,
        requested: Option<&str>,
    ) -> EngineResult<Employee> {
        if caller.is_staff() {
            return self.employee_for_user(&caller.user_id);
        }

        let employee_id = requested
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| EngineError::Validation {
                field: "employee_id".to_string(),
                message: "employee_id is required".to_string(),
            })?;

        self.store
            .get_by_id::<Employee>(employee_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "Employee",
                id: employee_id.to_string(),
            })
    }

    /// Lists every employee.
    pub fn list_employees(&self, caller: &Caller) -> EngineResult<Vec<Employee>> {
        caller.require(Role::REVIEWERS, "list employees")?;
        Ok(self.store.get_all()?)
    }

    /// Returns one employee by id.
    pub fn get_employee(&self, caller: &Caller, employee_id: &str) -> EngineResult<Employee> {
        caller.require(Role::REVIEWERS, "view employees")?;
        self.store
            .get_by_id(employee_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "Employee",
                id: employee_id.to_string(),
            })
    }

    /// Returns the caller's own employee profile.
    pub fn my_profile(&self, caller: &Caller) -> EngineResult<Employee> {
        caller.require(Role::ALL, "view own profile")?;
        self.employee_for_user(&caller.user_id)
    }

    /// Adds an employee to the directory. Emails must be unique.
    pub fn create_employee(
        &self,
        caller: &Caller,
        input: EmployeeInput,
        joining_date: NaiveDate,
    ) -> EngineResult<Employee> {
        caller.require(Role::DIRECTORY_ADMINS, "create employees")?;

        let key = email_lock_key(&input.email);
        self.locks.with_lock(&key, || -> EngineResult<_> {
            self.ensure_email_free(&input.email, None)?;
            let employee = self.store.add(Employee::from_input(input, joining_date))?;
            info!(employee_id = %employee.id, "Employee created");
            Ok(employee)
        })
    }

    /// Replaces an employee's directory fields.
    pub fn update_employee(
        &self,
        caller: &Caller,
        employee_id: &str,
        input: EmployeeInput,
    ) -> EngineResult<Employee> {
        caller.require(Role::DIRECTORY_ADMINS, "update employees")?;

        let key = email_lock_key(&input.email);
        self.locks.with_lock(&key, || -> EngineResult<_> {
            self.ensure_email_free(&input.email, Some(employee_id))?;
            self.store
                .update::<Employee, _>(employee_id, |e| e.apply_input(input))?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "Employee",
                    id: employee_id.to_string(),
                })
        })
    }

    /// Creates a login for an employee and links it to their profile.
    ///
    /// The login takes the employee's email. Fails with `Validation` when the
    /// employee already has a login or another login uses that email.
    /// Credentials are managed by the upstream access-control layer.
    pub fn create_login(
        &self,
        caller: &Caller,
        employee_id: &str,
        role: Role,
    ) -> EngineResult<User> {
        caller.require(Role::DIRECTORY_ADMINS, "create logins")?;

        self.locks.with_lock(employee_id, || -> EngineResult<_> {
            let employee = self
                .store
                .get_by_id::<Employee>(employee_id)?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "Employee",
                    id: employee_id.to_string(),
                })?;

            if employee.user_id.is_some() {
                return Err(EngineError::Validation {
                    field: "employee_id".to_string(),
                    message: "login already created for this employee".to_string(),
                });
            }

            let key = email_lock_key(&employee.email);
            self.locks.with_lock(&key, || -> EngineResult<_> {
                let taken = self
                    .store
                    .find(|u: &User| u.email.eq_ignore_ascii_case(&employee.email))?;
                if taken.is_some() {
                    return Err(EngineError::Validation {
                        field: "email".to_string(),
                        message: format!("a user with email '{}' already exists", employee.email),
                    });
                }

                let user = self.store.add(User {
                    id: String::new(),
                    email: employee.email.clone(),
                    role,
                    is_active: true,
                })?;
                self.store
                    .update::<Employee, _>(&employee.id, |e| e.user_id = Some(user.id.clone()))?;

                info!(employee_id = %employee.id, user_id = %user.id, role = %role, "Login created");
                Ok(user)
            })
        })
    }

    /// Removes an employee. Attendance and leave records referring to them are kept.
    pub fn delete_employee(&self, caller: &Caller, employee_id: &str) -> EngineResult<()> {
        caller.require(Role::DIRECTORY_ADMINS, "delete employees")?;
        if !self.store.delete::<Employee>(employee_id)? {
            return Err(EngineError::NotFound {
                entity: "Employee",
                id: employee_id.to_string(),
            });
        }
        info!(employee_id = %employee_id, "Employee deleted");
        Ok(())
    }

    fn ensure_email_free(&self, email: &str, except_id: Option<&str>) -> EngineResult<()> {
        let taken = self.store.find(|e: &Employee| {
            e.email.eq_ignore_ascii_case(email) && Some(e.id.as_str()) != except_id
        })?;
        if taken.is_some() {
            return Err(EngineError::Validation {
                field: "email".to_string(),
                message: format!("an employee with email '{}' already exists", email),
            });
        }
        Ok(())
    }
}
