pub const APP_STYLES: &str = r#"
/* Page */
.app-container {
    max-width: 880px;
    margin: 0 auto;
    padding: 2rem 1rem 4rem;
    display: flex;
    flex-direction: column;
    gap: 1rem;
    color: var(--text-primary, #f8fafc);
}

.title {
    margin: 0 0 0.5rem 0;
    text-align: center;
    font-size: 1.75rem;
    font-weight: 700;
}

/* Cards */
.card {
    background: var(--window-bg, #1e293b);
    border: 1px solid var(--border-color, #334155);
    border-radius: var(--radius-md, 8px);
    padding: 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
}

.card h3,
.card h4 {
    margin: 0;
}

.input-section {
    display: grid;
    grid-template-columns: 2fr 1fr;
    gap: 1rem;
}

@media (max-width: 720px) {
    .input-section {
        grid-template-columns: 1fr;
    }
}

.input-box {
    width: 100%;
    box-sizing: border-box;
    padding: 0.5rem 0.75rem;
    background: var(--input-bg, #0f172a);
    color: var(--text-primary, #f8fafc);
    border: 1px solid var(--border-color, #334155);
    border-radius: var(--radius-md, 8px);
    font: inherit;
}

.input-box:disabled {
    opacity: 0.5;
    cursor: not-allowed;
}

textarea.input-box {
    resize: vertical;
    min-height: 6rem;
}

.file-meta {
    display: flex;
    align-items: center;
    justify-content: space-between;
    gap: 0.5rem;
    font-size: 0.8rem;
    color: var(--text-secondary, #94a3b8);
    word-break: break-all;
}

/* Buttons */
.btn {
    padding: 0.5rem 1rem;
    background: var(--accent-bg, #3b82f6);
    color: white;
    border: none;
    border-radius: var(--radius-md, 8px);
    cursor: pointer;
    font-weight: 600;
}

.btn:disabled {
    opacity: 0.6;
    cursor: progress;
}

.btn-link {
    background: none;
    border: none;
    color: var(--accent-text, #93c5fd);
    cursor: pointer;
    padding: 0;
    font-size: 0.8rem;
}

/* Results */
.result-text {
    line-height: 1.6;
    overflow-wrap: anywhere;
}

.result-text table {
    border-collapse: collapse;
}

.result-text th,
.result-text td {
    border: 1px solid var(--border-color, #334155);
    padding: 0.25rem 0.5rem;
}

.disclaimer {
    font-size: 0.75rem;
    color: var(--text-secondary, #94a3b8);
}

.query-section {
    display: flex;
    gap: 0.5rem;
    margin-top: 0.5rem;
}

/* Notice */
.notice {
    display: flex;
    align-items: flex-start;
    justify-content: space-between;
    gap: 1rem;
    padding: 0.75rem 1rem;
    background: var(--danger-bg, #450a0a);
    border: 1px solid var(--danger-text, #ef4444);
    border-radius: var(--radius-md, 8px);
}

.notice-title {
    font-weight: 600;
    color: var(--danger-text, #ef4444);
}
"#;
