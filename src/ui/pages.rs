//! Page templates
//!
//! Each page extends the shared base layout; flash messages and an
//! optional inline form error render the same way everywhere.

use minijinja::{context, Environment};

use crate::auth::models::Role;
use crate::auth::session::{Flash, SessionIdentity};
use crate::catalog::Category;
use crate::error::Result;

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Brewdesk{% endblock %}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
    <div class="max-w-lg mx-auto px-6 py-12">
        <h1 class="text-2xl font-bold mb-6">{% block heading %}Brewdesk{% endblock %}</h1>
        {% for flash in flashes %}
        <div class="mb-4 px-4 py-3 rounded {% if flash.level == 'success' %}bg-green-800{% elif flash.level == 'error' %}bg-red-800{% else %}bg-gray-700{% endif %}">{{ flash.message }}</div>
        {% endfor %}
        {% if error %}
        <div class="mb-4 px-4 py-3 rounded bg-red-800">{{ error }}</div>
        {% endif %}
        {% block content %}{% endblock %}
    </div>
</body>
</html>
"#;

const LOGIN_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Login - Brewdesk{% endblock %}
{% block heading %}Sign in{% endblock %}
{% block content %}
<form method="post" action="/login" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="username">Username</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="text" id="username" name="username" required>
    </div>
    <div>
        <label class="block mb-1 text-sm" for="password">Password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="password" name="password" required>
    </div>
    <button class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium" type="submit">Sign in</button>
    <p class="text-sm text-gray-400"><a class="text-blue-400 hover:underline" href="/password/forgot">Forgot password?</a></p>
</form>
{% endblock %}
"#;

const DASHBOARD_OWNER_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Shop Owner - Brewdesk{% endblock %}
{% block heading %}Shop Owner dashboard{% endblock %}
{% block content %}
<p class="mb-2">Welcome, {{ username }}.</p>
{% if cafe %}<p class="mb-6 text-gray-400">Café: {{ cafe }}</p>{% endif %}
<nav class="space-y-3">
    <a href="/catalog/categories/new" class="block px-4 py-2 bg-green-600 hover:bg-green-700 rounded font-medium">+ Add category</a>
    <a href="/catalog/products/new" class="block px-4 py-2 bg-green-600 hover:bg-green-700 rounded font-medium">+ Add product</a>
    <a href="/password/change" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Change password</a>
    <a href="/logout" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Log out</a>
</nav>
{% endblock %}
"#;

const DASHBOARD_MANAGER_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Shop Manager - Brewdesk{% endblock %}
{% block heading %}Shop Manager dashboard{% endblock %}
{% block content %}
<p class="mb-2">Welcome, {{ username }}.</p>
{% if cafe %}<p class="mb-6 text-gray-400">Café: {{ cafe }}</p>{% endif %}
<nav class="space-y-3">
    <a href="/password/change" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Change password</a>
    <a href="/logout" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Log out</a>
</nav>
{% endblock %}
"#;

const DASHBOARD_CHEF_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Chef - Brewdesk{% endblock %}
{% block heading %}Chef dashboard{% endblock %}
{% block content %}
<p class="mb-2">Welcome, {{ username }}.</p>
{% if cafe %}<p class="mb-6 text-gray-400">Café: {{ cafe }}</p>{% endif %}
<nav class="space-y-3">
    <a href="/password/change" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Change password</a>
    <a href="/logout" class="block px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded font-medium">Log out</a>
</nav>
{% endblock %}
"#;

const ADD_CATEGORY_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Add category - Brewdesk{% endblock %}
{% block heading %}Add a category{% endblock %}
{% block content %}
<form method="post" action="/catalog/categories/new" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="category_name">Name</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="text" id="category_name" name="category_name">
    </div>
    <div>
        <label class="block mb-1 text-sm" for="description">Description</label>
        <textarea class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" id="description" name="description"></textarea>
    </div>
    <button class="w-full px-4 py-2 bg-green-600 hover:bg-green-700 rounded font-medium" type="submit">Create</button>
    <p class="text-sm"><a class="text-blue-400 hover:underline" href="/dashboard/owner">Back to dashboard</a></p>
</form>
{% endblock %}
"#;

const ADD_PRODUCT_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Add product - Brewdesk{% endblock %}
{% block heading %}Add a product{% endblock %}
{% block content %}
{% if categories %}
<form method="post" action="/catalog/products/new" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="product_name">Name</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="text" id="product_name" name="product_name">
    </div>
    <div>
        <label class="block mb-1 text-sm" for="description">Description</label>
        <textarea class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" id="description" name="description"></textarea>
    </div>
    <div>
        <label class="block mb-1 text-sm" for="price">Price</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="text" id="price" name="price">
    </div>
    <div>
        <label class="block mb-1 text-sm" for="category_id">Category</label>
        <select class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" id="category_id" name="category_id">
            {% for category in categories %}
            <option value="{{ category.id }}">{{ category.name }}</option>
            {% endfor %}
        </select>
    </div>
    <button class="w-full px-4 py-2 bg-green-600 hover:bg-green-700 rounded font-medium" type="submit">Create</button>
    <p class="text-sm"><a class="text-blue-400 hover:underline" href="/dashboard/owner">Back to dashboard</a></p>
</form>
{% else %}
<p class="mb-4 text-gray-400">Create a category before adding products.</p>
<p class="text-sm"><a class="text-blue-400 hover:underline" href="/catalog/categories/new">Add a category</a></p>
{% endif %}
{% endblock %}
"#;

const CHANGE_PASSWORD_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Change password - Brewdesk{% endblock %}
{% block heading %}Change password{% endblock %}
{% block content %}
<form method="post" action="/password/change" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="current_password">Current password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="current_password" name="current_password" required>
    </div>
    <div>
        <label class="block mb-1 text-sm" for="new_password">New password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="new_password" name="new_password" required>
    </div>
    <div>
        <label class="block mb-1 text-sm" for="confirm_password">Confirm new password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="confirm_password" name="confirm_password" required>
    </div>
    <button class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium" type="submit">Change password</button>
</form>
{% endblock %}
"#;

const FORGOT_PASSWORD_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Forgot password - Brewdesk{% endblock %}
{% block heading %}Forgot password{% endblock %}
{% block content %}
<form method="post" action="/password/forgot" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="email">Email address</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="email" id="email" name="email" required>
    </div>
    <button class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium" type="submit">Send OTP</button>
    <p class="text-sm"><a class="text-blue-400 hover:underline" href="/login">Back to login</a></p>
</form>
{% endblock %}
"#;

const VERIFY_OTP_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Verify OTP - Brewdesk{% endblock %}
{% block heading %}Enter your OTP{% endblock %}
{% block content %}
<p class="mb-4 text-gray-400">We emailed you a six-digit code. It is valid for 10 minutes.</p>
<form method="post" action="/password/otp" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="otp">OTP</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="text" id="otp" name="otp" inputmode="numeric" required>
    </div>
    <button class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium" type="submit">Verify</button>
</form>
{% endblock %}
"#;

const RESET_PASSWORD_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Reset password - Brewdesk{% endblock %}
{% block heading %}Choose a new password{% endblock %}
{% block content %}
<form method="post" action="/password/reset" class="space-y-4">
    <div>
        <label class="block mb-1 text-sm" for="new_password">New password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="new_password" name="new_password" required>
    </div>
    <div>
        <label class="block mb-1 text-sm" for="confirm_password">Confirm new password</label>
        <input class="w-full px-3 py-2 bg-gray-800 border border-gray-700 rounded" type="password" id="confirm_password" name="confirm_password" required>
    </div>
    <button class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium" type="submit">Reset password</button>
</form>
{% endblock %}
"#;

fn render(name: &str, source: &str, ctx: minijinja::Value) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE_TEMPLATE)?;
    env.add_template(name, source)?;
    let template = env.get_template(name)?;
    Ok(template.render(ctx)?)
}

pub fn render_login(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "login.html",
        LOGIN_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}

/// Render the dashboard for a logged-in identity
pub fn render_dashboard(identity: &SessionIdentity, flashes: &[Flash]) -> Result<String> {
    let (name, source) = match identity.role {
        Role::ShopOwner => ("dashboard_owner.html", DASHBOARD_OWNER_TEMPLATE),
        Role::ShopManager => ("dashboard_manager.html", DASHBOARD_MANAGER_TEMPLATE),
        Role::Chef => ("dashboard_chef.html", DASHBOARD_CHEF_TEMPLATE),
    };
    render(
        name,
        source,
        context! {
            flashes => flashes,
            error => None::<&str>,
            username => &identity.username,
            cafe => &identity.cafe,
        },
    )
}

pub fn render_add_category(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "add_category.html",
        ADD_CATEGORY_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}

pub fn render_add_product(
    categories: &[Category],
    flashes: &[Flash],
    error: Option<&str>,
) -> Result<String> {
    render(
        "add_product.html",
        ADD_PRODUCT_TEMPLATE,
        context! { flashes => flashes, error => error, categories => categories },
    )
}

pub fn render_change_password(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "change_password.html",
        CHANGE_PASSWORD_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}

pub fn render_forgot_password(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "forgot_password.html",
        FORGOT_PASSWORD_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}

pub fn render_verify_otp(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "verify_otp.html",
        VERIFY_OTP_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}

pub fn render_reset_password(flashes: &[Flash], error: Option<&str>) -> Result<String> {
    render(
        "reset_password.html",
        RESET_PASSWORD_TEMPLATE,
        context! { flashes => flashes, error => error },
    )
}
