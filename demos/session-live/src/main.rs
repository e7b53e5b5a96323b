//! # Purpose
//! Demonstrate the full session lifecycle end-to-end using the real session
//! store, the real vault, and the real access guard, with no shortcuts into
//! internal state.
//!
//! # What this demo proves
//! - Failed logins are rejected and leave the store logged out.
//! - Guard decisions follow the current identity's stored grants.
//! - Permission edits apply only to the current identity and take effect on
//!   the next guard check.
//! - A process restart (modeled as reopening the store over the same vault)
//!   rehydrates the persisted identity, overrides included.
//! - Roster visibility is society-scoped unless `society.view_all` is held.
//!
//! # High-level flow
//! 1. Open a session store over a shared vault (seeded principal table).
//! 2. Attempt a wrong-credential login; expect rejection.
//! 3. Log in as the super admin; expect cross-society guard access.
//! 4. Log out; expect the same guard to deny and skip protected content.
//! 5. Log in as the society admin; widen their grants via permission edit.
//! 6. Reopen the store over the same vault; expect the widened identity back.
//! 7. Exercise roster creation, role change, and scoped listing.
//!
//! # Notes on determinism
//! - Everything runs in-process against the in-memory vault; there are no
//!   timing dependencies.
use anyhow::{Context, Result, bail};
use atrium_authz::{AccessGuard, Permission, Role};
use atrium_session::{
    AdminRoster, NewAdmin, PrincipalDirectory, SESSION_SLOT_KEY, SessionError, SessionStore,
    init_telemetry,
};
use atrium_vault::{MemoryVault, SessionVault};
use std::sync::Arc;


#[tokio::main]
async fn main() -> Result<()> {
    run_demo().await
}

async fn run_demo() -> Result<()> {
    println!("== Atrium Demo: Session Lifecycle, Guarding, and Rehydration ==");
    init_telemetry();

    let vault: Arc<dyn SessionVault> = Arc::new(MemoryVault::new());
    let store = SessionStore::open(
        PrincipalDirectory::seeded(),
        Arc::clone(&vault),
        SESSION_SLOT_KEY,
    )
    .await
    .context("open session store")?;
    println!("STEP 0 session store open: PASS (logged out)");

    match store.login("super@admin.com", "wrong").await {
        Err(SessionError::InvalidCredentials) => {}
        Err(err) => bail!("STEP 1 FAIL unexpected error: {err}"),
        Ok(_) => bail!("STEP 1 FAIL wrong credential accepted"),
    }
    if store.current_identity().await.is_some() {
        bail!("STEP 1 FAIL rejected login altered the session");
    }
    println!("STEP 1 wrong credential rejected: PASS");

    let super_admin = store
        .login("super@admin.com", "admin123")
        .await
        .context("super admin login")?;
    let societies_guard = AccessGuard::permission(Permission::SocietyViewAll);
    print_guard(
        "STEP 2 super admin sees all societies",
        societies_guard.allows(Some(&super_admin)),
        true,
    )?;

    store.logout().await.context("logout")?;
    let mut protected_ran = false;
    let rendered = societies_guard.render(
        store.current_identity().await.as_ref(),
        || {
            protected_ran = true;
            "society list"
        },
        || "access denied",
    );
    if protected_ran || rendered != "access denied" {
        bail!("STEP 3 FAIL guard ran protected content while logged out");
    }
    println!("STEP 3 logged-out guard denies and short-circuits: PASS");

    let admin = store
        .login("admin@admin.com", "admin123")
        .await
        .context("admin login")?;
    let delete_guard = AccessGuard::permission(Permission::ResidentsDelete);
    print_guard(
        "STEP 4 admin lacks residents.delete",
        delete_guard.allows(Some(&admin)),
        false,
    )?;

    let mut widened = admin.permissions.clone();
    widened.insert(Permission::ResidentsDelete);
    store
        .update_permissions(admin.id, widened)
        .await
        .context("widen grants")?;
    let current = store
        .current_identity()
        .await
        .context("current identity after update")?;
    print_guard(
        "STEP 5 permission edit takes effect",
        delete_guard.allows(Some(&current)),
        true,
    )?;

    // A restart is just a new store over the same vault.
    drop(store);
    let reopened = SessionStore::open(
        PrincipalDirectory::seeded(),
        Arc::clone(&vault),
        SESSION_SLOT_KEY,
    )
    .await
    .context("reopen session store")?;
    let restored = reopened
        .current_identity()
        .await
        .context("restored identity")?;
    if restored.id != current.id || restored.permissions != current.permissions {
        bail!("STEP 6 FAIL rehydrated identity does not match");
    }
    println!("STEP 6 restart rehydrates the widened identity: PASS");

    let roster = AdminRoster::new();
    let scoped = roster
        .create_admin(NewAdmin {
            name: "Ops".to_string(),
            email: "ops@admin.com".to_string(),
            role: Role::Admin,
            permissions: None,
            society: restored.society.clone(),
        })
        .await
        .context("create scoped admin")?;
    roster
        .create_admin(NewAdmin {
            name: "Root".to_string(),
            email: "root@admin.com".to_string(),
            role: Role::SuperAdmin,
            permissions: None,
            society: None,
        })
        .await
        .context("create super admin")?;

    // The society-bound viewer sees the same-society admin but not the
    // unbound super admin entry.
    let visible = roster.visible_to(&restored).await;
    if visible.len() != 1 || visible[0].id != scoped.id {
        bail!("STEP 7 FAIL scoped visibility mismatch: {} visible", visible.len());
    }
    println!("STEP 7 roster visibility is society-scoped: PASS");

    let promoted = roster
        .change_role(scoped.id, Role::SuperAdmin)
        .await
        .context("promote scoped admin")?;
    if !promoted.has_permission(Permission::SocietyViewAll) {
        bail!("STEP 8 FAIL role change did not reset permissions to the new default");
    }
    println!("STEP 8 role change resets grants to the new default: PASS");

    println!("== All steps passed ==");
    Ok(())
}

fn print_guard(label: &str, decision: bool, expected: bool) -> Result<()> {
    if decision == expected {
        let outcome = if expected { "ALLOW" } else { "DENY" };
        println!("{label}: PASS (decision={outcome})");
        Ok(())
    } else {
        bail!("{label}: FAIL (decision={decision}, expected={expected})");
    }
}
