//! A form-validation hook: validation is memoized on the field values, so
//! re-rendering with unchanged input returns the cached verdict without
//! re-validating. Submissions are counted in the hook's state cell.

use std::rc::Rc;

use rehook_core::prelude::*;

struct FormState {
    valid: bool,
    errors: Vec<String>,
    submissions: u32,
    submit: Rc<dyn Fn()>,
}

fn validate(email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !email.contains('@') {
        errors.push(format!("'{email}' is not an email address"));
    }
    if password.len() < 8 {
        errors.push("password must be at least 8 characters".to_string());
    }
    errors
}

fn use_signup_form(email: String, password: String) -> Rc<FormState> {
    use_dynamic(
        (email.clone(), password.clone()),
        move |state: &StateHandle<u32>| {
            log::info!("validating '{email}'");
            let errors = validate(&email, &password);
            let submit = {
                let state = state.clone();
                move || state.update(|n| n.copied().unwrap_or(0) + 1)
            };
            FormState {
                valid: errors.is_empty(),
                errors,
                submissions: state.get().unwrap_or(0),
                submit: Rc::new(submit),
            }
        },
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new();

    let inputs = [
        ("jane", "pw"),
        ("jane", "pw"), // unchanged: memoized, no re-validation
        ("jane@example.com", "pw"),
        ("jane@example.com", "correct horse battery"),
    ];

    for (email, password) in inputs {
        let form = host.render(|| {
            let renders = remember_state(|| 0u32);
            *renders.borrow_mut() += 1;
            log::debug!("render #{}", renders.borrow());
            use_signup_form(email.to_string(), password.to_string())
        });

        if form.valid {
            (form.submit)();
            // `submissions` is the count committed before this render.
            println!("{email}: submitted (#{} this session)", form.submissions + 1);
        } else {
            println!("{email}: rejected — {}", form.errors.join("; "));
        }
    }

    host.unmount();
    Ok(())
}
