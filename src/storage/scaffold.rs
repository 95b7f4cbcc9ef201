//! Starter content written by `tutor init`
//!
//! A small payments guide across three tools, enough to exercise every
//! rendering feature: alerts, highlighted fences with filenames, images and
//! external links.

pub const CONFIG: &str = r#"# tutorial-kit configuration

# Tutorial shown when --tutorial is not given
default_tutorial = "payments"

[site]
# "production" prefixes image paths with base_path
profile = "development"
base_path = "/stripe-doc"

[viewer]
# Toast lifetime in 250ms ticks
toast_ticks = 8
"#;

pub const GITIGNORE: &str = r#"# Learner progress is personal
progress.json
progress.json.tmp
"#;

pub const TREE: &str = r#"[[tools]]
id = "stripe"
title = "Stripe"

[[tools]]
id = "nextjs"
title = "Next.js"

[[tools]]
id = "firebase"
title = "Firebase"

[titles]
stripe-account = "Create a Stripe account"
stripe-api-keys = "Find your API keys"
stripe-products = "Create products and prices"
stripe-live-mode = "Switch to live mode"
next-create-app = "Create a Next.js app"
next-checkout = "Start a checkout session"
next-portal = "Open the customer portal"
firebase-project = "Create a Firebase project"
firebase-stripe-extension = "Install the Stripe extension"

[tutorials.payments]
title = "Payments with Next.js and Firebase"
description = "Add subscriptions to a web app using the Firebase Stripe extension."
scenes = ["Subscriptions", "One-time purchases", "Customer portal"]
video_url = "https://www.youtube.com/watch?v=example"

[[tutorials.payments.steps]]
title = "Prepare accounts"
tool.stripe = ["stripe-account"]
tool.nextjs = ["next-create-app"]
tool.firebase = ["firebase-project"]

[[tutorials.payments.steps]]
title = "Connect Stripe to Firebase"
tool.stripe = ["stripe-api-keys"]
tool.firebase = ["firebase-stripe-extension"]

[[tutorials.payments.steps]]
title = "Build checkout"
tool.stripe = ["stripe-products"]
tool.nextjs = ["next-checkout", "next-portal"]

[[tutorials.payments.steps]]
title = "Go live"
tool.stripe = ["stripe-live-mode"]
"#;

pub const DOCS: &[(&str, &str)] = &[
    (
        "stripe-account",
        r#"# Create a Stripe account

Sign up at [stripe.com](https://dashboard.stripe.com/register).
Test mode is enabled by default.

:::info
You can explore the whole dashboard in test mode without verifying your business.
:::

![Stripe dashboard](/images/stripe-dashboard.png)
"#,
    ),
    (
        "stripe-api-keys",
        r#"# Find your API keys

Open **Developers > API keys** in the dashboard.

| Key | Prefix | Where |
|-----|--------|-------|
| Publishable | `pk_test_` | Browser |
| Secret | `sk_test_` | Server only |

:::warning
Never commit the secret key to your repository.
:::
"#,
    ),
    (
        "stripe-products",
        r#"# Create products and prices

Create a product with a recurring price, then note its price ID.

```bash
stripe prices list --limit 3
```
"#,
    ),
    (
        "stripe-live-mode",
        r#"# Switch to live mode

- [ ] Activate your account
- [ ] Replace test keys with live keys
- [ ] Recreate products in live mode

:::important
Live mode charges real cards.
:::
"#,
    ),
    (
        "next-create-app",
        r#"# Create a Next.js app

```bash:terminal
npx create-next-app@latest my-shop --ts
cd my-shop
```
"#,
    ),
    (
        "next-checkout",
        r#"# Start a checkout session

```ts:lib/checkout.ts
import { addDoc, collection, onSnapshot } from 'firebase/firestore';

export const goToCheckout = async (uid: string, price: string) => {
  const ref = await addDoc(collection(db, `customers/${uid}/checkout_sessions`), {
    price,
    success_url: window.location.origin,
  });
  onSnapshot(ref, (snap) => {
    const { url } = snap.data() ?? {};
    if (url) window.location.assign(url);
  });
};
```
"#,
    ),
    (
        "next-portal",
        r#"# Open the customer portal

```tsx:components/portal-button.tsx
export default function PortalButton() {
  return <button onClick={openPortal}>Manage billing</button>;
}
```
"#,
    ),
    (
        "firebase-project",
        r#"# Create a Firebase project

Create a project in the [Firebase console](https://console.firebase.google.com/)
and upgrade it to the Blaze plan.
"#,
    ),
    (
        "firebase-stripe-extension",
        r#"# Install the Stripe extension

```bash
firebase ext:install stripe/firestore-stripe-payments
```

```diff:firestore.rules
+ match /customers/{uid} {
+   allow read: if request.auth.uid == uid;
+ }
```
"#,
    ),
];
