use crate::auth::{register, use_auth};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use nestmatch::AppRoute;
use nestmatch_shared::protocol::account::Register;

/// 注册表单状态
#[derive(Clone, Default)]
struct RegisterForm {
    username: String,
    password: String,
    confirm: String,
    age: String,
    gender: String,
    affiliation: String,
    email_address: String,
}

impl RegisterForm {
    /// 校验并转换为注册请求
    fn to_request(&self) -> Result<Register, String> {
        let required = [
            &self.username,
            &self.password,
            &self.age,
            &self.gender,
            &self.affiliation,
            &self.email_address,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err("Please fill in all fields".to_string());
        }
        if self.password != self.confirm {
            return Err("Passwords do not match".to_string());
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| "Age must be a whole number".to_string())?;
        if !self.email_address.contains('@') {
            return Err("Please enter a valid email address".to_string());
        }

        Ok(Register {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            age,
            gender: self.gender.clone(),
            affiliation: self.affiliation.trim().to_string(),
            email_address: self.email_address.trim().to_string(),
        })
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();

    let form = RwSignal::new(RegisterForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match form.with(RegisterForm::to_request) {
            Ok(request) => request,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            if let Err(e) = register(auth, request).await {
                set_error_msg.set(Some(e.to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    // 文本输入框：label、type 与写入表单的字段
    let field = move |label: &'static str, kind: &'static str, set: fn(&mut RegisterForm, String)| {
        view! {
            <div class="form-control">
                <label class="label">
                    <span class="label-text">{label}</span>
                </label>
                <input
                    type=kind
                    class="input input-bordered"
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        {field("Username", "text", |f, v| f.username = v)}
                        {field("Email", "email", |f, v| f.email_address = v)}
                        {field("Password", "password", |f, v| f.password = v)}
                        {field("Confirm password", "password", |f, v| f.confirm = v)}
                        {field("Age", "number", |f, v| f.age = v)}

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Gender"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| f.gender = value);
                                }
                            >
                                <option value="" selected>"Select..."</option>
                                <option value="female">"Female"</option>
                                <option value="male">"Male"</option>
                                <option value="non-binary">"Non-binary"</option>
                                <option value="prefer not to say">"Prefer not to say"</option>
                            </select>
                        </div>

                        {field("School or workplace", "text", |f, v| f.affiliation = v)}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Create account".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegisterForm {
        RegisterForm {
            username: " carol ".into(),
            password: "pw".into(),
            confirm: "pw".into(),
            age: "23".into(),
            gender: "female".into(),
            affiliation: "MIT".into(),
            email_address: "carol@mit.edu".into(),
        }
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = filled().to_request().unwrap();
        assert_eq!(request.username, "carol");
        assert_eq!(request.age, 23);
    }

    #[test]
    fn test_form_validation_errors() {
        let mut form = filled();
        form.confirm = "other".into();
        assert_eq!(form.to_request().unwrap_err(), "Passwords do not match");

        let mut form = filled();
        form.age = "twenty".into();
        assert!(form.to_request().is_err());

        let mut form = filled();
        form.gender.clear();
        assert_eq!(form.to_request().unwrap_err(), "Please fill in all fields");
    }
}
